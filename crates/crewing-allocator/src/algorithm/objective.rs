use crewing_configuration::requirement_catalog::VehicleRequirements;
use crewing_scheduling_environment::mission::Mission;
use crewing_scheduling_environment::worker_environment::Worker;
use crewing_scheduling_environment::worker_environment::skills::Skills;

use super::candidate_filter::CandidateMission;

/// Credit per skill level up to the required minimum.
pub const MATCH_WEIGHT: f64 = 1.0;
/// Credit per skill level above the required minimum.
pub const OVERQUALIFICATION_BONUS: f64 = 0.5;
/// Weight of crewing cost against skill fit. Fixed, not configurable.
pub const COST_WEIGHT: f64 = 0.1;

/// A worker only counts towards a category from level 1 upwards.
pub const MINIMUM_COUNTED_LEVEL: f64 = 1.0;

pub fn skill_match_score(skills: &Skills, requirements: Option<&VehicleRequirements>) -> f64 {
    let Some(requirements) = requirements else {
        return 0.0;
    };

    requirements
        .required_skills
        .iter()
        .map(|(category, minimum)| {
            let level = skills.level(category);
            if level < MINIMUM_COUNTED_LEVEL {
                return 0.0;
            }
            let mut score = level.min(*minimum) * MATCH_WEIGHT;
            if level > *minimum {
                score += (level - minimum) * OVERQUALIFICATION_BONUS;
            }
            score
        })
        .sum()
}

pub fn assignment_cost(worker: &Worker, mission: &Mission) -> f64 {
    worker.daily_cost * mission.duration_days() as f64
}

pub fn objective_coefficient(worker: &Worker, candidate: &CandidateMission) -> f64 {
    skill_match_score(&worker.skills, candidate.requirements)
        - COST_WEIGHT * assignment_cost(worker, candidate.mission)
}
