pub mod error;
pub mod mission;
pub mod table;
pub mod time_environment;
pub mod vehicle;
pub mod worker_environment;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fmt::Display;
use std::hash::Hash;

use error::LoadError;
use mission::MISSION_ID_COLUMN;
use mission::Mission;
use mission::MissionId;
use table::Record;
use table::Table;
use table::TableKind;
use tracing::Level;
use tracing::event;
use vehicle::VEHICLE_ID_COLUMN;
use vehicle::Vehicle;
use vehicle::VehicleId;
use worker_environment::WORKER_ID_COLUMN;
use worker_environment::Worker;
use worker_environment::WorkerId;

pub trait Identified
{
    type Id: Clone + Eq + Hash + Display + fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Entities in load order with a lookup index on their identifier.
#[derive(Clone, Debug)]
pub struct Registry<T: Identified>
{
    entries: Vec<T>,
    index: HashMap<T::Id, usize>,
}

impl<T: Identified> Registry<T>
{
    pub fn new(table: TableKind, entries: Vec<T>) -> Result<Self, LoadError>
    {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            match index.entry(entry.id().clone()) {
                Entry::Occupied(_) => {
                    return Err(LoadError::DuplicateIdentifier {
                        table,
                        id: entry.id().to_string(),
                    });
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(position);
                }
            }
        }
        Ok(Self { entries, index })
    }

    pub fn get(&self, id: &T::Id) -> Option<&T>
    {
        self.index.get(id).map(|position| &self.entries[*position])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T>
    {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T]
    {
        &self.entries
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }
}

impl<T: Identified> Default for Registry<T>
{
    fn default() -> Self
    {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<'a, T: Identified> IntoIterator for &'a Registry<T>
{
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter
    {
        self.entries.iter()
    }
}

/// The normalized workers, vehicles and missions of one load. Built as a
/// whole or not at all.
#[derive(Clone, Debug, Default)]
pub struct SchedulingEnvironment
{
    pub workers: Registry<Worker>,
    pub vehicles: Registry<Vehicle>,
    pub missions: Registry<Mission>,
}

impl SchedulingEnvironment
{
    pub fn builder() -> SchedulingEnvironmentBuilder
    {
        SchedulingEnvironmentBuilder::default()
    }

    /// Validates the identifier columns of all three tables before any row is
    /// converted.
    pub fn from_tables(
        workers_table: &Table,
        vehicles_table: &Table,
        missions_table: &Table,
    ) -> Result<Self, LoadError>
    {
        workers_table.require_column(TableKind::Worker, WORKER_ID_COLUMN)?;
        vehicles_table.require_column(TableKind::Vehicle, VEHICLE_ID_COLUMN)?;
        missions_table.require_column(TableKind::Mission, MISSION_ID_COLUMN)?;

        let workers = convert_rows(workers_table, Worker::from_record)?;
        let vehicles = convert_rows(vehicles_table, Vehicle::from_record)?;
        let missions = convert_rows(missions_table, Mission::from_record)?;

        let scheduling_environment = SchedulingEnvironment::builder()
            .workers(workers)
            .vehicles(vehicles)
            .missions(missions)
            .build()?;

        event!(
            Level::INFO,
            workers = scheduling_environment.workers.len(),
            vehicles = scheduling_environment.vehicles.len(),
            missions = scheduling_environment.missions.len(),
            "scheduling environment loaded"
        );
        Ok(scheduling_environment)
    }

    pub fn worker(&self, worker_id: &WorkerId) -> Option<&Worker>
    {
        self.workers.get(worker_id)
    }

    pub fn vehicle(&self, vehicle_id: &VehicleId) -> Option<&Vehicle>
    {
        self.vehicles.get(vehicle_id)
    }

    pub fn mission(&self, mission_id: &MissionId) -> Option<&Mission>
    {
        self.missions.get(mission_id)
    }

    /// The vehicle a mission runs on, if its reference resolves.
    pub fn mission_vehicle(&self, mission: &Mission) -> Option<&Vehicle>
    {
        mission
            .vehicle_id
            .as_ref()
            .and_then(|vehicle_id| self.vehicle(vehicle_id))
    }
}

fn convert_rows<T>(
    table: &Table,
    convert: impl Fn(&Record) -> Result<T, LoadError>,
) -> Result<Vec<T>, LoadError>
{
    table.records().iter().map(convert).collect()
}

#[derive(Default)]
pub struct SchedulingEnvironmentBuilder
{
    workers: Option<Vec<Worker>>,
    vehicles: Option<Vec<Vehicle>>,
    missions: Option<Vec<Mission>>,
}

impl SchedulingEnvironmentBuilder
{
    pub fn build(self) -> Result<SchedulingEnvironment, LoadError>
    {
        Ok(SchedulingEnvironment {
            workers: Registry::new(TableKind::Worker, self.workers.unwrap_or_default())?,
            vehicles: Registry::new(TableKind::Vehicle, self.vehicles.unwrap_or_default())?,
            missions: Registry::new(TableKind::Mission, self.missions.unwrap_or_default())?,
        })
    }

    pub fn workers(mut self, workers: Vec<Worker>) -> Self
    {
        self.workers = Some(workers);
        self
    }

    pub fn vehicles(mut self, vehicles: Vec<Vehicle>) -> Self
    {
        self.vehicles = Some(vehicles);
        self
    }

    pub fn missions(mut self, missions: Vec<Mission>) -> Self
    {
        self.missions = Some(missions);
        self
    }
}

impl fmt::Display for SchedulingEnvironment
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(
            f,
            "The Scheduling Environment is currently comprised of\n  number of workers: {}\n  number of vehicles: {}\n  number of missions: {}",
            self.workers.len(),
            self.vehicles.len(),
            self.missions.len(),
        )
    }
}
