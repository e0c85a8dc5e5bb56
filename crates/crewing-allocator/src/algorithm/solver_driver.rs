use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;

use good_lp::Expression;
use good_lp::ProblemVariables;
use good_lp::ResolutionError;
use good_lp::Solution;
use good_lp::SolverModel;
use good_lp::Variable;
use good_lp::constraint;
use good_lp::variable;
use strum::Display;
use strum::EnumString;
use tracing::Level;
use tracing::event;

use super::allocation_model::AllocationModel;
use super::allocation_model::LinearConstraint;
use crate::allocation::AllocationStatus;

/// Tolerance for reading constraint activity off a solved model.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

#[derive(Display, EnumString, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SolverBackend {
    Microlp,
}

impl SolverBackend {
    /// The "construction" step of the backend. An unrecognised name is the
    /// only way this fails.
    pub fn create(name: &str) -> Result<Self, AllocationStatus> {
        SolverBackend::from_str(name.trim()).map_err(|_| AllocationStatus::SolverUnavailable {
            backend: name.to_string(),
        })
    }

    /// Maximizes the model objective over binary variables. Returns one value
    /// per assignment variable, or the status explaining why no optimum is
    /// available. Panics inside the backend are caught and reported.
    pub fn solve(&self, allocation_model: &AllocationModel) -> Result<Vec<f64>, AllocationStatus> {
        if let Some(unsatisfiable) = trivially_unsatisfiable(allocation_model) {
            event!(
                Level::INFO,
                constraint = %unsatisfiable.label,
                "constraint has no variables and cannot be met"
            );
            return Err(AllocationStatus::NotOptimal {
                status: INFEASIBLE.to_string(),
            });
        }

        if allocation_model.assignments().is_empty() {
            return Ok(Vec::new());
        }

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| match self {
            SolverBackend::Microlp => solve_with_microlp(allocation_model),
        }));

        match outcome {
            Ok(Ok(values)) => Ok(values),
            Ok(Err(resolution_error)) => {
                let status = backend_status(&resolution_error);
                event!(Level::WARN, backend = %self, %status, "solver did not reach an optimum");
                Err(AllocationStatus::NotOptimal { status })
            }
            Err(payload) => {
                let cause = panic_message(payload.as_ref());
                event!(Level::ERROR, backend = %self, %cause, "solver panicked");
                Err(AllocationStatus::OptimizationFailed { cause })
            }
        }
    }
}

const INFEASIBLE: &str = "INFEASIBLE";
const UNBOUNDED: &str = "UNBOUNDED";

fn solve_with_microlp(allocation_model: &AllocationModel) -> Result<Vec<f64>, ResolutionError> {
    let mut problem_variables = ProblemVariables::new();
    let variables: Vec<Variable> = allocation_model
        .assignments()
        .iter()
        .map(|_| problem_variables.add(variable().binary()))
        .collect();

    let objective: Expression = allocation_model
        .assignments()
        .iter()
        .zip(&variables)
        .map(|(assignment, variable)| assignment.coefficient * *variable)
        .sum();

    let mut problem = problem_variables.maximise(objective).using(good_lp::microlp);

    for linear_constraint in allocation_model.constraints() {
        if linear_constraint.terms.is_empty() {
            continue;
        }
        let activity: Expression = linear_constraint
            .terms
            .iter()
            .map(|(index, coefficient)| *coefficient * variables[*index])
            .sum();
        if let Some(lower) = linear_constraint.lower {
            problem.add_constraint(constraint!(activity.clone() >= lower));
        }
        if let Some(upper) = linear_constraint.upper {
            problem.add_constraint(constraint!(activity <= upper));
        }
    }

    let solution = problem.solve()?;

    Ok(variables
        .iter()
        .map(|variable| solution.value(*variable))
        .collect())
}

/// Rows without variables are constants; the backend never sees them. One
/// that the zero assignment violates makes the whole model infeasible.
fn trivially_unsatisfiable(allocation_model: &AllocationModel) -> Option<&LinearConstraint> {
    allocation_model.constraints().iter().find(|linear_constraint| {
        linear_constraint.terms.is_empty()
            && !linear_constraint.is_satisfied_by(0.0, FEASIBILITY_TOLERANCE)
    })
}

fn backend_status(resolution_error: &ResolutionError) -> String {
    match resolution_error {
        ResolutionError::Infeasible => INFEASIBLE.to_string(),
        ResolutionError::Unbounded => UNBOUNDED.to_string(),
        other => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "solver backend panicked".to_string()
    }
}
