use std::io::Read;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use crewing_scheduling_environment::table::Record;
use crewing_scheduling_environment::table::Table;
use serde_json::Value;
use tracing::Level;
use tracing::event;

/// `.json` files hold an array of records; anything else is CSV with a header
/// row.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open input table {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let table = if is_json {
        table_from_json(file)
    } else {
        table_from_csv(file)
    }
    .with_context(|| format!("Could not read input table {}", path.display()))?;

    event!(Level::DEBUG, path = %path.display(), records = table.len(), "input table read");
    Ok(table)
}

pub fn table_from_json(reader: impl Read) -> Result<Table> {
    let table: Table = serde_json::from_reader(reader).context("expected a JSON array of records")?;
    Ok(table)
}

/// Cells stay strings; numbers, dates and skill encodings are interpreted by
/// the loader. Empty cells become null.
pub fn table_from_csv(reader: impl Read) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    csv_reader
        .records()
        .map(|row| -> Result<Record> {
            let row = row?;
            Ok(headers
                .iter()
                .zip(row.iter())
                .map(|(column, cell)| {
                    let value = if cell.trim().is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell.to_string())
                    };
                    (column.to_string(), value)
                })
                .collect::<Record>())
        })
        .collect()
}
