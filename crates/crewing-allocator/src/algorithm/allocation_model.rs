use std::collections::HashSet;

use chrono::NaiveDate;
use crewing_scheduling_environment::mission::MissionId;
use crewing_scheduling_environment::time_environment::TimeWindow;
use crewing_scheduling_environment::worker_environment::Worker;
use crewing_scheduling_environment::worker_environment::WorkerId;
use strum::Display;
use strum::EnumIter;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::Level;
use tracing::event;

use super::candidate_filter::CandidateMission;
use super::objective::MINIMUM_COUNTED_LEVEL;
use super::objective::objective_coefficient;

pub type VariableIndex = usize;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("objective coefficient for worker {worker_id} on mission {mission_id} is not finite")]
    NonFiniteCoefficient {
        worker_id: WorkerId,
        mission_id: MissionId,
    },
}

/// One binary decision: is `worker_id` crewing `mission_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentVariable {
    pub worker_id: WorkerId,
    pub mission_id: MissionId,
    pub coefficient: f64,
}

#[derive(Display, EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    Availability,
    CrewSize,
    SkillCoverage,
}

/// `lower <= sum(coefficient * variable) <= upper`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub label: String,
    pub terms: Vec<(VariableIndex, f64)>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl LinearConstraint {
    fn at_most(
        family: ConstraintFamily,
        label: String,
        terms: Vec<(VariableIndex, f64)>,
        upper: f64,
    ) -> Self {
        Self {
            family,
            label,
            terms,
            lower: None,
            upper: Some(upper),
        }
    }

    fn at_least(
        family: ConstraintFamily,
        label: String,
        terms: Vec<(VariableIndex, f64)>,
        lower: f64,
    ) -> Self {
        Self {
            family,
            label,
            terms,
            lower: Some(lower),
            upper: None,
        }
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(variable, coefficient)| coefficient * values[*variable])
            .sum()
    }

    pub fn is_satisfied_by(&self, activity: f64, tolerance: f64) -> bool {
        self.lower.is_none_or(|lower| activity >= lower - tolerance)
            && self.upper.is_none_or(|upper| activity <= upper + tolerance)
    }
}

/// The 0/1 program for one optimization: one variable per (worker, candidate
/// mission) pair, laid out worker-major, a linear objective and the three
/// constraint families. Built fresh for every call.
#[derive(Clone, Debug)]
pub struct AllocationModel {
    number_of_missions: usize,
    assignments: Vec<AssignmentVariable>,
    constraints: Vec<LinearConstraint>,
}

impl AllocationModel {
    pub fn build(
        workers: &[Worker],
        candidates: &[CandidateMission],
        time_window: &TimeWindow,
    ) -> Result<Self, ModelError> {
        let mut allocation_model = Self {
            number_of_missions: candidates.len(),
            assignments: Vec::with_capacity(workers.len() * candidates.len()),
            constraints: Vec::new(),
        };

        for worker in workers {
            for candidate in candidates {
                let coefficient = objective_coefficient(worker, candidate);
                if !coefficient.is_finite() {
                    return Err(ModelError::NonFiniteCoefficient {
                        worker_id: worker.id.clone(),
                        mission_id: candidate.mission.id.clone(),
                    });
                }
                allocation_model.assignments.push(AssignmentVariable {
                    worker_id: worker.id.clone(),
                    mission_id: candidate.mission.id.clone(),
                    coefficient,
                });
            }
        }

        allocation_model.add_availability_constraints(workers, candidates, time_window);
        allocation_model.add_crew_size_constraints(workers, candidates);
        allocation_model.add_skill_coverage_constraints(workers, candidates);

        for constraint_family in ConstraintFamily::iter() {
            event!(
                Level::DEBUG,
                %constraint_family,
                constraints = allocation_model.constraints_of(constraint_family).count()
            );
        }
        event!(
            Level::INFO,
            variables = allocation_model.assignments.len(),
            constraints = allocation_model.constraints.len(),
            "allocation model built"
        );
        Ok(allocation_model)
    }

    pub fn variable_index(&self, worker_index: usize, mission_index: usize) -> VariableIndex {
        worker_index * self.number_of_missions + mission_index
    }

    pub fn assignments(&self) -> &[AssignmentVariable] {
        &self.assignments
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraints_of(
        &self,
        constraint_family: ConstraintFamily,
    ) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints
            .iter()
            .filter(move |constraint| constraint.family == constraint_family)
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.assignments
            .iter()
            .zip(values)
            .map(|(assignment, value)| assignment.coefficient * value)
            .sum()
    }

    /// A worker can crew at most one mission on any day. Days covered by the
    /// same set of missions give identical rows, so each distinct non-empty
    /// covering set is emitted once per worker.
    fn add_availability_constraints(
        &mut self,
        workers: &[Worker],
        candidates: &[CandidateMission],
        time_window: &TimeWindow,
    ) {
        let mut seen_covering_sets: HashSet<Vec<usize>> = HashSet::new();
        let mut covering_sets: Vec<(NaiveDate, Vec<usize>)> = Vec::new();

        for day in time_window.days() {
            let covering: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, candidate)| candidate.mission.covers(day))
                .map(|(mission_index, _)| mission_index)
                .collect();

            if covering.is_empty() || !seen_covering_sets.insert(covering.clone()) {
                continue;
            }
            covering_sets.push((day, covering));
        }

        for (worker_index, worker) in workers.iter().enumerate() {
            for (day, covering) in &covering_sets {
                let terms = covering
                    .iter()
                    .map(|mission_index| (self.variable_index(worker_index, *mission_index), 1.0))
                    .collect();
                self.constraints.push(LinearConstraint::at_most(
                    ConstraintFamily::Availability,
                    format!("availability_{}_{}", worker.id, day),
                    terms,
                    1.0,
                ));
            }
        }
    }

    fn add_crew_size_constraints(&mut self, workers: &[Worker], candidates: &[CandidateMission]) {
        for (mission_index, candidate) in candidates.iter().enumerate() {
            let Some(requirements) = candidate.requirements else {
                continue;
            };
            if requirements.min_crew == 0 {
                continue;
            }
            let terms = (0..workers.len())
                .map(|worker_index| (self.variable_index(worker_index, mission_index), 1.0))
                .collect();
            self.constraints.push(LinearConstraint::at_least(
                ConstraintFamily::CrewSize,
                format!("crew_size_{}", candidate.mission.id),
                terms,
                requirements.min_crew as f64,
            ));
        }
    }

    /// Sums skill levels, not heads: one strong worker may cover a category
    /// alone.
    fn add_skill_coverage_constraints(
        &mut self,
        workers: &[Worker],
        candidates: &[CandidateMission],
    ) {
        for (mission_index, candidate) in candidates.iter().enumerate() {
            let Some(requirements) = candidate.requirements else {
                continue;
            };
            for (category, minimum) in &requirements.required_skills {
                let terms = workers
                    .iter()
                    .enumerate()
                    .filter_map(|(worker_index, worker)| {
                        let level = worker.skills.level(category);
                        (level >= MINIMUM_COUNTED_LEVEL)
                            .then(|| (self.variable_index(worker_index, mission_index), level))
                    })
                    .collect();
                self.constraints.push(LinearConstraint::at_least(
                    ConstraintFamily::SkillCoverage,
                    format!("skill_{}_{}", candidate.mission.id, category),
                    terms,
                    *minimum,
                ));
            }
        }
    }
}
