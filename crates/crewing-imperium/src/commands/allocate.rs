use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::ValueEnum;
use crewing_allocator::CrewAllocator;
use crewing_allocator::allocation::AllocationResult;
use crewing_allocator::report::MissionReport;
use crewing_allocator::report::StatusRecord;
use crewing_configuration::SystemConfigurations;
use strum::Display;
use tracing::Level;
use tracing::event;

use crate::sources::read_table;

#[derive(ValueEnum, Display, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load the three input tables and crew every mission overlapping the window.
#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Worker table (employee_id, name, position, skills, daily_cost)
    #[arg(long)]
    pub workers: PathBuf,
    /// Vehicle table (vessel_id, name, type, capacity)
    #[arg(long)]
    pub vehicles: PathBuf,
    /// Mission table (voyage_id, vessel_id, route, start_date, end_date)
    #[arg(long)]
    pub missions: PathBuf,
    /// First day of the window, e.g. 2025-04-01
    #[arg(long)]
    pub start: String,
    /// Last day of the window, inclusive
    #[arg(long)]
    pub end: String,
    /// TOML file with solver settings and vehicle type requirements
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn allocate(allocate_args: &AllocateArgs) -> Result<String> {
    let system_configurations =
        SystemConfigurations::read_all_configs(allocate_args.config.as_deref())?;
    let mut crew_allocator = CrewAllocator::new(system_configurations);

    let workers = read_table(&allocate_args.workers)?;
    let vehicles = read_table(&allocate_args.vehicles)?;
    let missions = read_table(&allocate_args.missions)?;
    crew_allocator
        .load(&workers, &vehicles, &missions)
        .context("Could not load the input tables")?;
    event!(
        Level::DEBUG,
        scheduling_environment = %crew_allocator.scheduling_environment()
    );

    let allocation_result =
        crew_allocator.optimize(allocate_args.start.as_str(), allocate_args.end.as_str());
    event!(
        Level::INFO,
        status = %allocation_result.status(),
        format = %allocate_args.format,
        "optimization finished"
    );

    let report = crew_allocator
        .generate_report(&allocation_result)
        .map_err(|report_status| StatusRecord::from(&report_status));

    render(&allocation_result, &report, allocate_args.format)
}

fn render(
    allocation_result: &AllocationResult,
    report: &Result<Vec<MissionReport>, StatusRecord>,
    output_format: OutputFormat,
) -> Result<String> {
    match output_format {
        OutputFormat::Json => {
            let document = match report {
                Ok(mission_reports) => serde_json::json!({
                    "allocation": allocation_result,
                    "report": mission_reports,
                }),
                Err(status_record) => serde_json::json!({
                    "allocation": allocation_result,
                    "report": status_record,
                }),
            };
            Ok(serde_json::to_string_pretty(&document)?)
        }
        OutputFormat::Text => match report {
            Ok(mission_reports) => {
                let mut lines = vec![format!("Status: {}", allocation_result.status())];
                if let Some(allocation) = allocation_result.allocation() {
                    lines.push(format!(
                        "Total assignments: {}  Objective: {:.2}",
                        allocation.total_assignments, allocation.objective_value
                    ));
                }
                lines.extend(
                    mission_reports
                        .iter()
                        .map(|mission_report| format!("\n{mission_report}")),
                );
                Ok(lines.join("\n"))
            }
            Err(status_record) => Ok(status_record.status.clone()),
        },
    }
}
