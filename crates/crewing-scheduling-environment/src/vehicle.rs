use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::Identified;
use crate::error::LoadError;
use crate::table::Record;
use crate::table::TableKind;
use crate::table::cell_identifier;
use crate::table::cell_number;
use crate::table::cell_text;

pub const VEHICLE_ID_COLUMN: &str = "vessel_id";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VehicleId
{
    fn from(value: &str) -> Self
    {
        VehicleId(value.to_string())
    }
}

/// The `vehicle_type` label is an open set. Only labels present in the
/// requirement catalog produce crew and skill constraints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle
{
    pub id: VehicleId,
    pub name: String,
    pub vehicle_type: String,
    pub capacity: Option<f64>,
}

impl Vehicle
{
    pub fn new(id: VehicleId, name: impl Into<String>, vehicle_type: impl Into<String>) -> Self
    {
        Self {
            id,
            name: name.into(),
            vehicle_type: vehicle_type.into(),
            capacity: None,
        }
    }

    pub(crate) fn from_record(record: &Record) -> Result<Self, LoadError>
    {
        let id = cell_identifier(record, VEHICLE_ID_COLUMN).ok_or(LoadError::MissingIdentifier {
            table: TableKind::Vehicle,
            column: VEHICLE_ID_COLUMN,
        })?;

        Ok(Self {
            id: VehicleId(id),
            name: cell_text(record, "name").unwrap_or_else(|| "Unknown".to_string()),
            vehicle_type: cell_text(record, "type")
                .map(|vehicle_type| vehicle_type.trim().to_string())
                .unwrap_or_default(),
            capacity: cell_number(record, "capacity").and_then(Result::ok),
        })
    }
}

impl Identified for Vehicle
{
    type Id = VehicleId;

    fn id(&self) -> &VehicleId
    {
        &self.id
    }
}
