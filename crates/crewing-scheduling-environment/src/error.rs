use chrono::NaiveDate;
use thiserror::Error;

use crate::table::TableKind;

/// Structural problems in the input tables. These are the only failures that
/// abort a load; everything else degrades.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError
{
    #[error("{table} data missing {column}")]
    MissingIdentifier { table: TableKind, column: &'static str },
    #[error("{table} data contains duplicate identifier {id}")]
    DuplicateIdentifier { table: TableKind, id: String },
    #[error("Mission {mission_id}: could not parse {column} '{value}' as a date")]
    InvalidDate {
        mission_id: String,
        column: &'static str,
        value: String,
    },
    #[error("Mission {mission_id} ends on {end} before it starts on {start}")]
    EndBeforeStart {
        mission_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Worker {worker_id}: daily_cost {value} is not a non-negative number")]
    InvalidDailyCost { worker_id: String, value: String },
}
