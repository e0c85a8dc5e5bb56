use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_BACKEND: &str = "microlp";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings
{
    /// Name of the mixed integer backend. Resolved when a model is solved, so
    /// an unknown name surfaces as a status on the allocation result.
    #[serde(default = "default_backend")]
    pub backend: String,
}

fn default_backend() -> String
{
    DEFAULT_BACKEND.to_string()
}

impl Default for SolverSettings
{
    fn default() -> Self
    {
        Self {
            backend: default_backend(),
        }
    }
}
