pub mod skills;

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use tracing::Level;
use tracing::event;

use self::skills::ParsedSkills;
use self::skills::Skills;
use crate::Identified;
use crate::error::LoadError;
use crate::table::Record;
use crate::table::TableKind;
use crate::table::cell_identifier;
use crate::table::cell_number;
use crate::table::cell_text;

pub const WORKER_ID_COLUMN: &str = "employee_id";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl fmt::Display for WorkerId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId
{
    fn from(value: &str) -> Self
    {
        WorkerId(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worker
{
    pub id: WorkerId,
    pub name: String,
    pub position: String,
    pub skills: Skills,
    pub daily_cost: f64,
}

impl Worker
{
    pub fn new(id: WorkerId, name: impl Into<String>, position: impl Into<String>) -> Self
    {
        Self {
            id,
            name: name.into(),
            position: position.into(),
            skills: Skills::default(),
            daily_cost: 0.0,
        }
    }

    pub fn with_skills(mut self, skills: Skills) -> Self
    {
        self.skills = skills;
        self
    }

    pub fn with_daily_cost(mut self, daily_cost: f64) -> Self
    {
        self.daily_cost = daily_cost;
        self
    }

    /// The identifier column has already been verified by the caller.
    pub(crate) fn from_record(record: &Record) -> Result<Self, LoadError>
    {
        let id = WorkerId(cell_identifier(record, WORKER_ID_COLUMN).ok_or(
            LoadError::MissingIdentifier {
                table: TableKind::Worker,
                column: WORKER_ID_COLUMN,
            },
        )?);

        let daily_cost = match cell_number(record, "daily_cost") {
            None => 0.0,
            Some(Ok(cost)) if cost >= 0.0 => cost,
            Some(Ok(cost)) => {
                return Err(LoadError::InvalidDailyCost {
                    worker_id: id.0,
                    value: cost.to_string(),
                });
            }
            Some(Err(raw)) => {
                return Err(LoadError::InvalidDailyCost {
                    worker_id: id.0,
                    value: raw,
                });
            }
        };

        let parsed_skills = ParsedSkills::parse(record.get("skills"));
        if parsed_skills == ParsedSkills::Empty && record.get("skills").is_some() {
            event!(
                Level::DEBUG,
                worker_id = %id,
                raw_skills = ?record.get("skills"),
                "skill profile could not be parsed, worker has no skills"
            );
        }

        Ok(Self {
            id,
            name: cell_text(record, "name").unwrap_or_else(|| "Unknown".to_string()),
            position: cell_text(record, "position").unwrap_or_else(|| "Unknown".to_string()),
            skills: parsed_skills.into_skills(),
            daily_cost,
        })
    }
}

impl Identified for Worker
{
    type Id = WorkerId;

    fn id(&self) -> &WorkerId
    {
        &self.id
    }
}
