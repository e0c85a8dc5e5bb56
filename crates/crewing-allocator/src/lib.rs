pub mod algorithm;
pub mod allocation;
pub mod report;

use std::sync::Arc;

use allocation::AllocationResult;
use allocation::AllocationStatus;
use arc_swap::ArcSwap;
use crewing_configuration::SystemConfigurations;
use crewing_scheduling_environment::SchedulingEnvironment;
use crewing_scheduling_environment::error::LoadError;
use crewing_scheduling_environment::table::Table;
use crewing_scheduling_environment::time_environment::IntoCalendarDate;
use crewing_scheduling_environment::time_environment::TimeWindow;
use report::MissionReport;
use report::ReportStatus;
use tracing::Level;
use tracing::event;
use tracing::instrument;

/// Entry point for the surrounding layers: load the three tables once, then
/// optimize and report as often as needed. Each `optimize` call builds and
/// discards its own model.
pub struct CrewAllocator {
    pub system_configurations: Arc<ArcSwap<SystemConfigurations>>,
    scheduling_environment: SchedulingEnvironment,
}

impl CrewAllocator {
    pub fn new(system_configurations: Arc<ArcSwap<SystemConfigurations>>) -> Self {
        Self {
            system_configurations,
            scheduling_environment: SchedulingEnvironment::default(),
        }
    }

    /// Replaces the loaded data only when all three tables convert cleanly.
    /// On failure the previous environment stays in place.
    pub fn load(
        &mut self,
        workers_table: &Table,
        vehicles_table: &Table,
        missions_table: &Table,
    ) -> Result<(), LoadError> {
        match SchedulingEnvironment::from_tables(workers_table, vehicles_table, missions_table) {
            Ok(scheduling_environment) => {
                self.scheduling_environment = scheduling_environment;
                Ok(())
            }
            Err(load_error) => {
                event!(Level::ERROR, %load_error, "Error loading data");
                Err(load_error)
            }
        }
    }

    /// Window boundaries may be dates or date strings. A boundary that does
    /// not parse is reported as a failed optimization, like every other
    /// failure past this point.
    #[instrument(level = "info", skip_all)]
    pub fn optimize<S, E>(&self, start: S, end: E) -> AllocationResult
    where
        S: IntoCalendarDate,
        E: IntoCalendarDate,
    {
        let time_window = match (start.into_calendar_date(), end.into_calendar_date()) {
            (Ok(start), Ok(end)) => TimeWindow::new(start, end),
            (Err(invalid_date), _) | (_, Err(invalid_date)) => {
                event!(Level::ERROR, %invalid_date);
                return AllocationStatus::OptimizationFailed {
                    cause: invalid_date.to_string(),
                }
                .into();
            }
        };

        let system_configurations = self.system_configurations.load();
        algorithm::optimize_allocation(
            &self.scheduling_environment,
            &system_configurations,
            time_window,
        )
    }

    pub fn generate_report(
        &self,
        allocation_result: &AllocationResult,
    ) -> Result<Vec<MissionReport>, ReportStatus> {
        report::generate_report(&self.scheduling_environment, allocation_result)
    }

    pub fn scheduling_environment(&self) -> &SchedulingEnvironment {
        &self.scheduling_environment
    }
}

impl Default for CrewAllocator {
    fn default() -> Self {
        Self::new(SystemConfigurations::default().shared())
    }
}
