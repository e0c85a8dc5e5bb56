use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use strum::Display;

use crate::error::LoadError;

/// A single row of an input table. Cells keep whatever shape the upstream
/// collaborator produced, so a skill profile can be either a nested object or
/// a string encoding of one.
pub type Record = serde_json::Map<String, Value>;

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind
{
    Worker,
    Vehicle,
    Mission,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table
{
    records: Vec<Record>,
}

impl Table
{
    pub fn new(records: Vec<Record>) -> Self
    {
        Self { records }
    }

    pub fn records(&self) -> &[Record]
    {
        &self.records
    }

    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    /// Every record has to carry a non-null value for `column`. An empty
    /// table trivially satisfies this.
    pub fn require_column(&self, table: TableKind, column: &'static str) -> Result<(), LoadError>
    {
        let missing = self
            .records
            .iter()
            .any(|record| record.get(column).is_none_or(Value::is_null));

        if missing {
            return Err(LoadError::MissingIdentifier { table, column });
        }
        Ok(())
    }
}

impl From<Vec<Record>> for Table
{
    fn from(records: Vec<Record>) -> Self
    {
        Self::new(records)
    }
}

impl FromIterator<Record> for Table
{
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self
    {
        Self::new(iter.into_iter().collect())
    }
}

/// Identifiers arrive as strings from CSV sources and as integers from
/// generated data. Both normalize to the same string form.
pub fn cell_identifier(record: &Record, column: &str) -> Option<String>
{
    match record.get(column)? {
        Value::String(string) => {
            let trimmed = string.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(boolean) => Some(boolean.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn cell_text(record: &Record, column: &str) -> Option<String>
{
    match record.get(column)? {
        Value::String(string) => Some(string.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(boolean) => Some(boolean.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// `None` when the cell is absent or null, `Some(Err(raw))` when a value is
/// present but not numeric.
pub fn cell_number(record: &Record, column: &str) -> Option<Result<f64, String>>
{
    match record.get(column)? {
        Value::Null => None,
        Value::String(string) if string.trim().is_empty() => None,
        value => Some(value_as_number(value).ok_or_else(|| value.to_string())),
    }
}

pub fn value_as_number(value: &Value) -> Option<f64>
{
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests
{
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record
    {
        match value {
            Value::Object(map) => map,
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn test_require_column_rejects_single_missing_record()
    {
        let table = Table::new(vec![
            record(json!({"employee_id": 101})),
            record(json!({"name": "no id"})),
        ]);

        assert_eq!(
            table.require_column(TableKind::Worker, "employee_id"),
            Err(LoadError::MissingIdentifier {
                table: TableKind::Worker,
                column: "employee_id"
            })
        );
    }

    #[test]
    fn test_require_column_treats_null_as_missing()
    {
        let table = Table::new(vec![record(json!({"vessel_id": null}))]);

        assert!(table.require_column(TableKind::Vehicle, "vessel_id").is_err());
    }

    #[test]
    fn test_require_column_accepts_empty_table()
    {
        assert!(
            Table::default()
                .require_column(TableKind::Mission, "voyage_id")
                .is_ok()
        );
    }

    #[test]
    fn test_identifiers_normalize_numbers_and_strings()
    {
        let record = record(json!({"a": 101, "b": " 101 ", "c": ""}));

        assert_eq!(cell_identifier(&record, "a"), Some("101".to_string()));
        assert_eq!(cell_identifier(&record, "b"), Some("101".to_string()));
        assert_eq!(cell_identifier(&record, "c"), None);
    }

    #[test]
    fn test_cell_number()
    {
        let record = record(json!({"a": 250, "b": "312.5", "c": "lots", "d": null}));

        assert_eq!(cell_number(&record, "a"), Some(Ok(250.0)));
        assert_eq!(cell_number(&record, "b"), Some(Ok(312.5)));
        assert_eq!(cell_number(&record, "c"), Some(Err("\"lots\"".to_string())));
        assert_eq!(cell_number(&record, "d"), None);
        assert_eq!(cell_number(&record, "e"), None);
    }
}
