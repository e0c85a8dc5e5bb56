use crewing_configuration::requirement_catalog::RequirementCatalog;
use crewing_configuration::requirement_catalog::VehicleRequirements;
use crewing_scheduling_environment::SchedulingEnvironment;
use crewing_scheduling_environment::mission::Mission;
use crewing_scheduling_environment::time_environment::TimeWindow;
use crewing_scheduling_environment::vehicle::Vehicle;
use tracing::Level;
use tracing::event;

/// A mission that takes part in one optimization, with its vehicle and the
/// catalog entry for that vehicle's type already resolved.
#[derive(Clone, Copy, Debug)]
pub struct CandidateMission<'a> {
    pub mission: &'a Mission,
    pub vehicle: &'a Vehicle,
    /// `None` for vehicle types outside the catalog.
    pub requirements: Option<&'a VehicleRequirements>,
}

/// Missions overlapping `time_window` whose vehicle resolves, in load order.
pub fn candidate_missions<'a>(
    scheduling_environment: &'a SchedulingEnvironment,
    requirement_catalog: &'a RequirementCatalog,
    time_window: &TimeWindow,
) -> Vec<CandidateMission<'a>> {
    let candidates: Vec<CandidateMission> = scheduling_environment
        .missions
        .iter()
        .filter(|mission| mission.overlaps(time_window))
        .filter_map(|mission| {
            let Some(vehicle) = scheduling_environment.mission_vehicle(mission) else {
                event!(
                    Level::WARN,
                    mission_id = %mission.id,
                    vehicle_id = ?mission.vehicle_id,
                    "mission vehicle does not resolve, mission is excluded"
                );
                return None;
            };
            Some(CandidateMission {
                mission,
                vehicle,
                requirements: requirement_catalog.requirements(&vehicle.vehicle_type),
            })
        })
        .collect();

    for uncatalogued in candidates.iter().filter(|candidate| candidate.requirements.is_none()) {
        event!(
            Level::DEBUG,
            mission_id = %uncatalogued.mission.id,
            vehicle = %uncatalogued.vehicle.name,
            vehicle_type = %uncatalogued.vehicle.vehicle_type,
            "vehicle type has no catalog entry, mission carries no crew requirements"
        );
    }
    event!(
        Level::DEBUG,
        loaded = scheduling_environment.missions.len(),
        retained = candidates.len(),
        "candidate missions selected"
    );
    candidates
}
