use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use crewing_configuration::SystemConfigurations;
use crewing_configuration::requirement_catalog::RequirementCatalog;

/// Print the vehicle type requirements the allocator would use.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// TOML file with solver settings and vehicle type requirements
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn catalog(catalog_args: &CatalogArgs) -> Result<String> {
    let system_configurations =
        SystemConfigurations::read_all_configs(catalog_args.config.as_deref())?;
    let system_configurations = system_configurations.load();

    Ok(format!(
        "Solver backend: {}\n{}",
        system_configurations.solver.backend,
        render_catalog(&system_configurations.requirement_catalog)
    ))
}

fn render_catalog(requirement_catalog: &RequirementCatalog) -> String {
    requirement_catalog
        .entries()
        .into_iter()
        .map(|(vehicle_type, requirements)| {
            let skills = requirements
                .required_skills
                .iter()
                .map(|(category, level)| format!("{category} >= {level}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{vehicle_type}: min crew {}, skills [{skills}]",
                requirements.min_crew
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
