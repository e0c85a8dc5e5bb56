use std::fmt;

use crewing_scheduling_environment::SchedulingEnvironment;
use crewing_scheduling_environment::mission::MissionId;
use crewing_scheduling_environment::worker_environment::WorkerId;
use crewing_scheduling_environment::worker_environment::skills::Skills;
use serde::Serialize;
use thiserror::Error;
use tracing::Level;
use tracing::event;

use crate::allocation::AllocationResult;

const UNKNOWN: &str = "Unknown";

/// Why no report list could be produced. Rendered as a status-only record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportStatus {
    #[error("No optimal allocation: {0}")]
    NoOptimalAllocation(String),
    #[error("No allocations found in results")]
    NoAllocations,
    #[error("No valid mission allocations to report")]
    NoValidAllocations,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusRecord {
    pub status: String,
}

impl From<&ReportStatus> for StatusRecord {
    fn from(report_status: &ReportStatus) -> Self {
        Self {
            status: report_status.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrewMember {
    pub id: WorkerId,
    pub name: String,
    pub position: String,
    pub skills: Skills,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MissionReport {
    pub mission_id: MissionId,
    pub vehicle: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub route: String,
    pub dates: String,
    /// Number of assigned workers, including any that no longer resolve.
    pub crew_count: usize,
    pub crew: Vec<CrewMember>,
}

/// Missions, vehicles and workers that do not resolve against
/// `scheduling_environment` are skipped. Missions come out in ascending id
/// order.
pub fn generate_report(
    scheduling_environment: &SchedulingEnvironment,
    allocation_result: &AllocationResult,
) -> Result<Vec<MissionReport>, ReportStatus> {
    let allocation = match allocation_result {
        AllocationResult::Optimal(allocation) => allocation,
        AllocationResult::Status(allocation_status) => {
            return Err(ReportStatus::NoOptimalAllocation(
                allocation_status.to_string(),
            ));
        }
    };
    if allocation.is_empty() {
        return Err(ReportStatus::NoAllocations);
    }

    let mut mission_reports = Vec::with_capacity(allocation.allocations.len());
    for (mission_id, worker_ids) in &allocation.allocations {
        let Some(mission) = scheduling_environment.mission(mission_id) else {
            event!(Level::DEBUG, %mission_id, "allocated mission not found, skipped in report");
            continue;
        };
        let Some(vehicle) = scheduling_environment.mission_vehicle(mission) else {
            event!(Level::DEBUG, %mission_id, "mission vehicle not found, skipped in report");
            continue;
        };

        let crew = worker_ids
            .iter()
            .filter_map(|worker_id| scheduling_environment.worker(worker_id))
            .map(|worker| CrewMember {
                id: worker.id.clone(),
                name: worker.name.clone(),
                position: worker.position.clone(),
                skills: worker.skills.clone(),
            })
            .collect();

        mission_reports.push(MissionReport {
            mission_id: mission_id.clone(),
            vehicle: vehicle.name.clone(),
            vehicle_type: if vehicle.vehicle_type.is_empty() {
                UNKNOWN.to_string()
            } else {
                vehicle.vehicle_type.clone()
            },
            route: mission.route.clone(),
            dates: mission.formatted_dates(),
            crew_count: worker_ids.len(),
            crew,
        });
    }

    if mission_reports.is_empty() {
        return Err(ReportStatus::NoValidAllocations);
    }
    event!(Level::INFO, missions = mission_reports.len(), "allocation report generated");
    Ok(mission_reports)
}

impl fmt::Display for MissionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mission {} | {} ({}) | {} | {}",
            self.mission_id, self.vehicle, self.vehicle_type, self.route, self.dates
        )?;
        write!(f, "  crew: {}", self.crew_count)?;
        for crew_member in &self.crew {
            write!(
                f,
                "\n    {:<8} {:<24} {:<20} {}",
                crew_member.id, crew_member.name, crew_member.position, crew_member.skills
            )?;
        }
        Ok(())
    }
}
