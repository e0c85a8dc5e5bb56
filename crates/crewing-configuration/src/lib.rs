pub mod requirement_catalog;
pub mod solver;

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use arc_swap::ArcSwap;
use requirement_catalog::RequirementCatalog;
use requirement_catalog::VehicleTypeEntry;
use serde::Deserialize;
use solver::SolverSettings;
use tracing::Level;
use tracing::event;

pub const CONFIGURATION_ENV: &str = "CREWING_CONFIGURATION";

/// Shape of the configuration file. Both sections are optional.
#[derive(Debug, Default, Deserialize)]
struct SystemConfigurationsToml
{
    #[serde(default)]
    solver: SolverSettings,
    #[serde(default)]
    vehicle_types: Vec<VehicleTypeEntry>,
}

/// All configuration the allocator needs, loaded in one place and handed to
/// the allocator already wrapped, so every optimization reads a single
/// consistent snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemConfigurations
{
    pub solver: SolverSettings,
    pub requirement_catalog: RequirementCatalog,
}

impl Default for SystemConfigurations
{
    fn default() -> Self
    {
        Self {
            solver: SolverSettings::default(),
            requirement_catalog: RequirementCatalog::seeded(),
        }
    }
}

impl SystemConfigurations
{
    /// Vehicle types given in the file are layered over the seeded catalog.
    pub fn from_toml_str(contents: &str) -> Result<Self>
    {
        let system_configurations_toml: SystemConfigurationsToml =
            toml::from_str(contents).context("Could not parse the crewing configuration")?;

        Ok(Self {
            solver: system_configurations_toml.solver,
            requirement_catalog: RequirementCatalog::seeded()
                .with_entries(system_configurations_toml.vehicle_types),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self>
    {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read configuration file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    /// An explicit path wins over `CREWING_CONFIGURATION`. With neither, the
    /// seeded defaults are used.
    pub fn read_all_configs(path: Option<&Path>) -> Result<Arc<ArcSwap<SystemConfigurations>>>
    {
        let _ = dotenvy::dotenv();

        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| dotenvy::var(CONFIGURATION_ENV).ok().map(PathBuf::from));

        let system_configurations = match path {
            Some(path) => {
                event!(Level::INFO, configuration = %path.display(), "reading configuration");
                Self::from_path(&path)?
            }
            None => {
                event!(Level::INFO, "no configuration file given, using seeded defaults");
                Self::default()
            }
        };

        Ok(system_configurations.shared())
    }

    pub fn shared(self) -> Arc<ArcSwap<SystemConfigurations>>
    {
        Arc::new(ArcSwap::new(Arc::new(self)))
    }
}
