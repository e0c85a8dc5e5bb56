pub mod allocation_model;
pub mod assert_functions;
pub mod candidate_filter;
pub mod objective;
pub mod solver_driver;

use std::panic::AssertUnwindSafe;

use allocation_model::AllocationModel;
use assert_functions::AllocationAssertions;
use candidate_filter::candidate_missions;
use crewing_configuration::SystemConfigurations;
use crewing_scheduling_environment::SchedulingEnvironment;
use crewing_scheduling_environment::time_environment::TimeWindow;
use solver_driver::SolverBackend;
use tracing::Level;
use tracing::event;

use crate::allocation::Allocation;
use crate::allocation::AllocationResult;
use crate::allocation::AllocationStatus;

/// Runs one optimization over the missions overlapping `time_window`. Every
/// failure is reported through the returned status, nothing is raised.
pub fn optimize_allocation(
    scheduling_environment: &SchedulingEnvironment,
    system_configurations: &SystemConfigurations,
    time_window: TimeWindow,
) -> AllocationResult {
    let candidates = candidate_missions(
        scheduling_environment,
        &system_configurations.requirement_catalog,
        &time_window,
    );
    if candidates.is_empty() {
        event!(
            Level::INFO,
            start = %time_window.start,
            end = %time_window.end,
            "no missions in period"
        );
        return AllocationStatus::NoMissionsInPeriod.into();
    }

    let solver_backend = match SolverBackend::create(&system_configurations.solver.backend) {
        Ok(solver_backend) => solver_backend,
        Err(allocation_status) => {
            event!(Level::ERROR, %allocation_status);
            return allocation_status.into();
        }
    };

    let workers = scheduling_environment.workers.as_slice();
    let model_outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
        AllocationModel::build(workers, &candidates, &time_window)
    }));
    let allocation_model = match model_outcome {
        Ok(Ok(allocation_model)) => allocation_model,
        Ok(Err(model_error)) => {
            event!(Level::ERROR, %model_error, "allocation model could not be built");
            return AllocationStatus::OptimizationFailed {
                cause: model_error.to_string(),
            }
            .into();
        }
        Err(_) => {
            event!(Level::ERROR, "allocation model construction panicked");
            return AllocationStatus::OptimizationFailed {
                cause: "allocation model construction panicked".to_string(),
            }
            .into();
        }
    };

    let values = match solver_backend.solve(&allocation_model) {
        Ok(values) => values,
        Err(allocation_status) => return allocation_status.into(),
    };

    let allocation_result = verified_allocation(&allocation_model, &values);
    if let Some(allocation) = allocation_result.allocation() {
        event!(
            Level::INFO,
            missions = candidates.len(),
            crewed_missions = allocation.allocations.len(),
            objective_value = allocation.objective_value,
            "optimal allocation found"
        );
    }
    allocation_result
}

/// Only an assignment that satisfies every row of the model is reported as
/// optimal.
fn verified_allocation(allocation_model: &AllocationModel, values: &[f64]) -> AllocationResult {
    if let Err(violation) = allocation_model.assert_that_constraints_are_respected(values) {
        event!(Level::ERROR, %violation, "solver returned an allocation outside the model");
        return AllocationStatus::OptimizationFailed {
            cause: format!("solver returned an allocation outside the model: {violation}"),
        }
        .into();
    }
    AllocationResult::Optimal(Allocation::extract(allocation_model, values))
}
