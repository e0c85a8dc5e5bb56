use chrono::Days;
use chrono::NaiveDate;
use crewing_allocator::CrewAllocator;
use crewing_allocator::allocation::AllocationResult;
use crewing_allocator::allocation::AllocationStatus;
use crewing_allocator::report::ReportStatus;
use crewing_configuration::SystemConfigurations;
use crewing_configuration::requirement_catalog::VehicleRequirements;
use crewing_scheduling_environment::mission::MissionId;
use crewing_scheduling_environment::table::Table;
use crewing_scheduling_environment::worker_environment::WorkerId;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

const PILOT_BOAT: &str = "Pilot Boat";

fn table(value: Value) -> Table {
    serde_json::from_value(value).unwrap()
}

fn crew_allocator_with_pilot_boats() -> CrewAllocator {
    let mut system_configurations = SystemConfigurations::default();
    system_configurations.requirement_catalog.insert(
        PILOT_BOAT,
        VehicleRequirements::new(1, [("navigation", 3.0)]),
    );
    CrewAllocator::new(system_configurations.shared())
}

fn vehicles() -> Table {
    table(json!([
        {"vessel_id": 201, "name": "Vessel 1", "type": "Container Ship", "capacity": 20},
        {"vessel_id": 202, "name": "Vessel 2", "type": "Tanker", "capacity": 18},
        {"vessel_id": 203, "name": "Vessel 3", "type": PILOT_BOAT, "capacity": 4}
    ]))
}

#[test]
fn scenario_a_no_missions_in_window() -> anyhow::Result<()> {
    let mut crew_allocator = CrewAllocator::default();
    crew_allocator.load(
        &table(json!([
            {"employee_id": 101, "name": "Employee 1", "position": "Captain",
             "skills": {"navigation": 4}, "daily_cost": 300}
        ])),
        &vehicles(),
        &table(json!([
            {"voyage_id": 301, "vessel_id": 201, "route": "Singapore to Dubai",
             "start_date": "2025-03-01", "end_date": "2025-03-10"}
        ])),
    )?;

    let allocation_result = crew_allocator.optimize("2025-04-01", "2025-04-30");

    assert_eq!(allocation_result.status(), "No missions in specified period");
    assert_eq!(
        crew_allocator.generate_report(&allocation_result),
        Err(ReportStatus::NoOptimalAllocation(
            "No missions in specified period".to_string()
        ))
    );
    Ok(())
}

#[test]
fn scenario_b_undersized_roster_is_infeasible() -> anyhow::Result<()> {
    let mut crew_allocator = CrewAllocator::default();
    crew_allocator.load(
        &table(json!([
            {"employee_id": 101, "name": "Employee 1", "position": "Captain",
             "skills": "{'navigation': 5, 'safety_training': 4}", "daily_cost": 300},
            {"employee_id": 102, "name": "Employee 2", "position": "Officer",
             "skills": "{'cargo_handling': 3}", "daily_cost": 200},
            {"employee_id": 103, "name": "Employee 3", "position": "Deckhand",
             "skills": "{}", "daily_cost": 100}
        ])),
        &vehicles(),
        &table(json!([
            {"voyage_id": 301, "vessel_id": 201, "route": "Shanghai to Los Angeles",
             "start_date": "2025-03-26", "end_date": "2025-04-02"}
        ])),
    )?;

    let allocation_result = crew_allocator.optimize("2025-03-01", "2025-04-30");

    assert_eq!(
        allocation_result,
        AllocationResult::Status(AllocationStatus::NotOptimal {
            status: "INFEASIBLE".to_string()
        })
    );
    Ok(())
}

#[test]
fn scenario_c_overqualified_navigator_alone() -> anyhow::Result<()> {
    let mut crew_allocator = crew_allocator_with_pilot_boats();
    crew_allocator.load(
        &table(json!([
            {"employee_id": 101, "name": "Employee 1", "position": "Pilot",
             "skills": {"navigation": 5}, "daily_cost": 0}
        ])),
        &vehicles(),
        &table(json!([
            {"voyage_id": 301, "vessel_id": 203, "route": "Harbour to Anchorage",
             "start_date": "2025-05-01", "end_date": "2025-05-02"}
        ])),
    )?;

    let allocation_result = crew_allocator.optimize("2025-05-01", "2025-05-31");

    let allocation = allocation_result.allocation().unwrap();
    assert_eq!(allocation.crew(&MissionId::from("301")), [WorkerId::from("101")]);
    assert!((allocation.objective_value - 4.0).abs() < 1e-9);
    assert!((allocation.total_assignments - 1.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn scenario_d_unparseable_skills_degrade_to_empty() -> anyhow::Result<()> {
    let mut crew_allocator = crew_allocator_with_pilot_boats();
    crew_allocator.load(
        &table(json!([
            {"employee_id": 101, "name": "Employee 1", "position": "Pilot",
             "skills": {"navigation": 3}, "daily_cost": 0},
            {"employee_id": 102, "name": "Employee 2", "position": "Deckhand",
             "skills": "navigation five, probably", "daily_cost": 0}
        ])),
        &vehicles(),
        &table(json!([
            {"voyage_id": 301, "vessel_id": 203, "route": "Harbour to Anchorage",
             "start_date": "2025-05-01", "end_date": "2025-05-02"}
        ])),
    )?;

    let deckhand = crew_allocator
        .scheduling_environment()
        .worker(&WorkerId::from("102"))
        .unwrap();
    assert!(deckhand.skills.is_empty());

    let allocation_result = crew_allocator.optimize("2025-05-01", "2025-05-02");

    // The deckhand costs nothing and scores nothing, so only the pilot adds
    // to the objective whichever way the tie is broken.
    let allocation = allocation_result.allocation().unwrap();
    assert!((allocation.objective_value - 3.0).abs() < 1e-9);
    assert!(
        allocation
            .crew(&MissionId::from("301"))
            .contains(&WorkerId::from("101"))
    );
    Ok(())
}

#[test]
fn scenario_e_unresolved_vehicle_is_excluded() -> anyhow::Result<()> {
    let mut crew_allocator = crew_allocator_with_pilot_boats();
    crew_allocator.load(
        &table(json!([
            {"employee_id": 101, "name": "Employee 1", "position": "Pilot",
             "skills": "{\"navigation\": 4}", "daily_cost": 50}
        ])),
        &vehicles(),
        &table(json!([
            {"voyage_id": 301, "vessel_id": 203, "route": "Harbour to Anchorage",
             "start_date": "2025-05-01", "end_date": "2025-05-02"},
            {"voyage_id": 302, "vessel_id": 999, "route": "Ghost run",
             "start_date": "2025-05-01", "end_date": "2025-05-02"}
        ])),
    )?;

    let allocation_result = crew_allocator.optimize("2025-05-01", "2025-05-31");
    let mission_reports = crew_allocator.generate_report(&allocation_result)?;

    let allocation = allocation_result.allocation().unwrap();
    assert!(allocation.crew(&MissionId::from("302")).is_empty());
    assert_eq!(mission_reports.len(), 1);
    assert_eq!(mission_reports[0].mission_id, MissionId::from("301"));
    assert_eq!(mission_reports[0].vehicle, "Vessel 3");
    assert_eq!(mission_reports[0].crew[0].name, "Employee 1");
    Ok(())
}

#[test]
fn back_to_back_missions_need_different_crews() -> anyhow::Result<()> {
    let mut crew_allocator = crew_allocator_with_pilot_boats();
    crew_allocator.load(
        &table(json!([
            {"employee_id": 101, "name": "Employee 1", "position": "Pilot",
             "skills": {"navigation": 5}, "daily_cost": 10},
            {"employee_id": 102, "name": "Employee 2", "position": "Pilot",
             "skills": {"navigation": 3}, "daily_cost": 10}
        ])),
        &vehicles(),
        &table(json!([
            {"voyage_id": 301, "vessel_id": 203, "route": "Out",
             "start_date": "2025-05-01", "end_date": "2025-05-03"},
            {"voyage_id": 302, "vessel_id": 203, "route": "Back",
             "start_date": "2025-05-03", "end_date": "2025-05-05"}
        ])),
    )?;

    let allocation_result = crew_allocator.optimize("2025-05-01", "2025-05-05");

    let allocation = allocation_result.allocation().unwrap();
    let outbound = allocation.crew(&MissionId::from("301"));
    let inbound = allocation.crew(&MissionId::from("302"));
    assert_eq!(outbound.len(), 1);
    assert_eq!(inbound.len(), 1);
    assert_ne!(outbound, inbound);
    Ok(())
}

#[derive(Clone, Debug)]
struct GeneratedWorker {
    navigation: u32,
    safety_training: u32,
    daily_cost: u32,
}

#[derive(Clone, Debug)]
struct GeneratedMission {
    vehicle_id: u32,
    start_offset: u64,
    length: u64,
}

fn generated_worker() -> impl Strategy<Value = GeneratedWorker> {
    (0u32..6, 0u32..4, 0u32..50).prop_map(|(navigation, safety_training, daily_cost)| {
        GeneratedWorker {
            navigation,
            safety_training,
            daily_cost,
        }
    })
}

fn generated_mission() -> impl Strategy<Value = GeneratedMission> {
    (prop_oneof![Just(202u32), Just(203u32), Just(204u32)], 0u64..8, 0u64..4).prop_map(
        |(vehicle_id, start_offset, length)| GeneratedMission {
            vehicle_id,
            start_offset,
            length,
        },
    )
}

fn load_generated(
    workers: &[GeneratedWorker],
    missions: &[GeneratedMission],
) -> anyhow::Result<CrewAllocator> {
    let first_day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let mut crew_allocator = crew_allocator_with_pilot_boats();

    let workers_table = table(Value::Array(
        workers
            .iter()
            .enumerate()
            .map(|(index, worker)| {
                json!({
                    "employee_id": 100 + index,
                    "name": format!("Employee {index}"),
                    "position": "Crew",
                    "skills": {
                        "navigation": worker.navigation,
                        "safety_training": worker.safety_training,
                        "hazardous_materials": 2
                    },
                    "daily_cost": worker.daily_cost
                })
            })
            .collect(),
    ));
    let vehicles_table = table(json!([
        {"vessel_id": 202, "name": "Vessel 2", "type": "Tanker"},
        {"vessel_id": 203, "name": "Vessel 3", "type": PILOT_BOAT},
        {"vessel_id": 204, "name": "Vessel 4", "type": "Research Vessel"}
    ]));
    let missions_table = table(Value::Array(
        missions
            .iter()
            .enumerate()
            .map(|(index, mission)| {
                let start = first_day + Days::new(mission.start_offset);
                let end = start + Days::new(mission.length);
                json!({
                    "voyage_id": 300 + index,
                    "vessel_id": mission.vehicle_id,
                    "route": "Generated",
                    "start_date": start.to_string(),
                    "end_date": end.to_string()
                })
            })
            .collect(),
    ));

    crew_allocator.load(&workers_table, &vehicles_table, &missions_table)?;
    Ok(crew_allocator)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn solved_allocations_respect_every_constraint(
        workers in prop::collection::vec(generated_worker(), 1..6),
        missions in prop::collection::vec(generated_mission(), 1..4),
    ) {
        let crew_allocator = load_generated(&workers, &missions).unwrap();
        let scheduling_environment = crew_allocator.scheduling_environment();
        let requirement_catalog = crew_allocator
            .system_configurations
            .load()
            .requirement_catalog
            .clone();

        let allocation_result = crew_allocator.optimize("2025-06-01", "2025-06-14");
        let second_result = crew_allocator.optimize("2025-06-01", "2025-06-14");

        prop_assert_eq!(allocation_result.status(), second_result.status());

        let (Some(allocation), Some(second_allocation)) =
            (allocation_result.allocation(), second_result.allocation())
        else {
            return Ok(());
        };
        prop_assert!((allocation.objective_value - second_allocation.objective_value).abs() < 1e-6);

        for worker in scheduling_environment.workers.iter() {
            let assigned: Vec<_> = allocation
                .allocations
                .iter()
                .filter(|(_, crew)| crew.contains(&worker.id))
                .filter_map(|(mission_id, _)| scheduling_environment.mission(mission_id))
                .collect();
            for (index, mission) in assigned.iter().enumerate() {
                for other in &assigned[index + 1..] {
                    prop_assert!(mission.end < other.start || other.end < mission.start);
                }
            }
        }

        for mission in scheduling_environment.missions.iter() {
            let vehicle = scheduling_environment.mission_vehicle(mission).unwrap();
            let Some(requirements) = requirement_catalog.requirements(&vehicle.vehicle_type) else {
                continue;
            };
            let crew = allocation.crew(&mission.id);
            prop_assert!(crew.len() >= requirements.min_crew as usize);
            for (category, minimum) in &requirements.required_skills {
                let coverage: f64 = crew
                    .iter()
                    .filter_map(|worker_id| scheduling_environment.worker(worker_id))
                    .map(|worker| worker.skills.level(category))
                    .filter(|level| *level >= 1.0)
                    .sum();
                prop_assert!(coverage >= *minimum);
            }
        }
    }
}
