use std::collections::BTreeMap;

use crewing_scheduling_environment::mission::MissionId;
use crewing_scheduling_environment::worker_environment::WorkerId;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use thiserror::Error;

use crate::algorithm::allocation_model::AllocationModel;

pub const OPTIMAL: &str = "OPTIMAL";

/// Solved values above this are read as "assigned".
pub const ASSIGNMENT_THRESHOLD: f64 = 0.5;

/// Every way an optimization can end without an optimal allocation. These
/// travel inside `AllocationResult` and are never raised to the caller.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum AllocationStatus {
    #[error("No missions in specified period")]
    NoMissionsInPeriod,
    #[error("Failed to create solver: unknown backend '{backend}'")]
    SolverUnavailable { backend: String },
    #[error("No optimal solution found (status: {status})")]
    NotOptimal { status: String },
    #[error("Optimization failed: {cause}")]
    OptimizationFailed { cause: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Allocation {
    /// Sum of the solved variable values, not a count of thresholded ones.
    pub total_assignments: f64,
    pub objective_value: f64,
    pub allocations: BTreeMap<MissionId, Vec<WorkerId>>,
}

impl Allocation {
    pub fn empty() -> Self {
        Self {
            total_assignments: 0.0,
            objective_value: 0.0,
            allocations: BTreeMap::new(),
        }
    }

    /// Reads the solved variable values back into mission crews. Crew order
    /// follows worker load order because the variables are laid out that way.
    pub fn extract(allocation_model: &AllocationModel, values: &[f64]) -> Self {
        let mut allocations: BTreeMap<MissionId, Vec<WorkerId>> = BTreeMap::new();

        for (assignment, value) in allocation_model.assignments().iter().zip(values) {
            if *value > ASSIGNMENT_THRESHOLD {
                allocations
                    .entry(assignment.mission_id.clone())
                    .or_default()
                    .push(assignment.worker_id.clone());
            }
        }

        Self {
            total_assignments: values.iter().sum(),
            objective_value: allocation_model.objective_value(values),
            allocations,
        }
    }

    pub fn crew(&self, mission_id: &MissionId) -> &[WorkerId] {
        self.allocations
            .get(mission_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AllocationResult {
    Optimal(Allocation),
    Status(AllocationStatus),
}

impl AllocationResult {
    pub fn status(&self) -> String {
        match self {
            AllocationResult::Optimal(_) => OPTIMAL.to_string(),
            AllocationResult::Status(allocation_status) => allocation_status.to_string(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, AllocationResult::Optimal(_))
    }

    pub fn allocation(&self) -> Option<&Allocation> {
        match self {
            AllocationResult::Optimal(allocation) => Some(allocation),
            AllocationResult::Status(_) => None,
        }
    }
}

impl From<AllocationStatus> for AllocationResult {
    fn from(allocation_status: AllocationStatus) -> Self {
        AllocationResult::Status(allocation_status)
    }
}

/// `{"status": "OPTIMAL", "total_assignments": .., "objective_value": ..,
/// "allocations": {..}}` or a status-only record.
impl Serialize for AllocationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AllocationResult::Optimal(allocation) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("status", OPTIMAL)?;
                map.serialize_entry("total_assignments", &allocation.total_assignments)?;
                map.serialize_entry("objective_value", &allocation.objective_value)?;
                map.serialize_entry("allocations", &allocation.allocations)?;
                map.end()
            }
            AllocationResult::Status(allocation_status) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("status", &allocation_status.to_string())?;
                map.end()
            }
        }
    }
}
