use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::Identified;
use crate::error::LoadError;
use crate::table::Record;
use crate::table::TableKind;
use crate::table::cell_identifier;
use crate::table::cell_text;
use crate::time_environment::TimeWindow;
use crate::time_environment::parse_calendar_date;
use crate::vehicle::VEHICLE_ID_COLUMN;
use crate::vehicle::VehicleId;

pub const MISSION_ID_COLUMN: &str = "voyage_id";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl fmt::Display for MissionId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MissionId
{
    fn from(value: &str) -> Self
    {
        MissionId(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission
{
    pub id: MissionId,
    /// `None` when the record carried no vehicle reference. Such a mission
    /// never resolves and is never optimized.
    pub vehicle_id: Option<VehicleId>,
    pub route: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Mission
{
    pub fn new(
        id: MissionId,
        vehicle_id: VehicleId,
        route: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self
    {
        Self {
            id,
            vehicle_id: Some(vehicle_id),
            route: route.into(),
            start,
            end,
        }
    }

    /// Whole days between start and end. A mission starting and ending on the
    /// same day has zero duration.
    pub fn duration_days(&self) -> i64
    {
        (self.end - self.start).num_days()
    }

    pub fn covers(&self, day: NaiveDate) -> bool
    {
        self.start <= day && day <= self.end
    }

    pub fn overlaps(&self, window: &TimeWindow) -> bool
    {
        window.overlaps(self.start, self.end)
    }

    pub fn formatted_dates(&self) -> String
    {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    pub(crate) fn from_record(record: &Record) -> Result<Self, LoadError>
    {
        let id = cell_identifier(record, MISSION_ID_COLUMN).ok_or(LoadError::MissingIdentifier {
            table: TableKind::Mission,
            column: MISSION_ID_COLUMN,
        })?;

        let date_column = |column: &'static str| -> Result<NaiveDate, LoadError> {
            let raw = cell_text(record, column).unwrap_or_default();
            parse_calendar_date(&raw).ok_or_else(|| LoadError::InvalidDate {
                mission_id: id.clone(),
                column,
                value: raw,
            })
        };

        let start = date_column("start_date")?;
        let end = date_column("end_date")?;

        if end < start {
            return Err(LoadError::EndBeforeStart {
                mission_id: id,
                start,
                end,
            });
        }

        Ok(Self {
            vehicle_id: cell_identifier(record, VEHICLE_ID_COLUMN).map(VehicleId),
            route: cell_text(record, "route").unwrap_or_else(|| "Unknown".to_string()),
            id: MissionId(id),
            start,
            end,
        })
    }
}

impl Identified for Mission
{
    type Id = MissionId;

    fn id(&self) -> &MissionId
    {
        &self.id
    }
}

#[cfg(test)]
mod tests
{
    use serde_json::json;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate
    {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn record(value: serde_json::Value) -> Record
    {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_mission_from_record_normalizes_dates() -> anyhow::Result<()>
    {
        let mission = Mission::from_record(&record(json!({
            "voyage_id": 301,
            "vessel_id": 201,
            "route": "Singapore to Rotterdam",
            "start_date": "2025-03-28T06:00:00",
            "end_date": "2025-04-08"
        })))?;

        assert_eq!(mission.start, date(2025, 3, 28));
        assert_eq!(mission.end, date(2025, 4, 8));
        assert_eq!(mission.vehicle_id, Some(VehicleId::from("201")));
        assert_eq!(mission.duration_days(), 11);
        assert_eq!(mission.formatted_dates(), "2025-03-28 to 2025-04-08");
        Ok(())
    }

    #[test]
    fn test_mission_without_vehicle_reference_loads()
    {
        let mission = Mission::from_record(&record(json!({
            "voyage_id": "V1",
            "start_date": "2025-03-28",
            "end_date": "2025-03-28"
        })));

        assert!(mission.is_ok_and(|mission| mission.vehicle_id.is_none()));
    }

    #[test]
    fn test_end_before_start_is_rejected()
    {
        let result = Mission::from_record(&record(json!({
            "voyage_id": "V1",
            "vessel_id": "S1",
            "start_date": "2025-04-02",
            "end_date": "2025-04-01"
        })));

        assert!(matches!(result, Err(LoadError::EndBeforeStart { .. })));
    }

    #[test]
    fn test_missing_date_is_rejected()
    {
        let result = Mission::from_record(&record(json!({
            "voyage_id": "V1",
            "vessel_id": "S1",
            "start_date": "2025-04-02"
        })));

        assert_eq!(
            result,
            Err(LoadError::InvalidDate {
                mission_id: "V1".to_string(),
                column: "end_date",
                value: String::new()
            })
        );
    }

    #[test]
    fn test_covers_is_inclusive()
    {
        let mission = Mission::new(
            MissionId::from("V1"),
            VehicleId::from("S1"),
            "Dubai to Mumbai",
            date(2025, 4, 1),
            date(2025, 4, 3),
        );

        assert!(mission.covers(date(2025, 4, 1)));
        assert!(mission.covers(date(2025, 4, 3)));
        assert!(!mission.covers(date(2025, 4, 4)));
    }
}
