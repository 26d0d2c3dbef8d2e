use crate::domain::model::{Record, Table};
use crate::utils::error::Result;
use serde_json::Value;

/// Parses delimited text with a header row into a [`Table`].
///
/// Column names are trimmed here so a stray space in a header does not
/// surface later as a missing column. Cells are kept as trimmed strings;
/// blank cells become `Null`. Fully blank lines are skipped.
pub fn parse_table(data: &[u8], delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(strip_bom(data));

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let data = columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.clone(), cell_value(row.get(index))))
            .collect();
        records.push(Record { data });
    }

    tracing::debug!("Parsed table with {} columns and {} rows", columns.len(), records.len());
    Ok(Table { columns, records })
}

/// Parses delimited text positionally, ignoring header names. Returns the
/// raw cells of each non-blank data row with its 1-based line number.
pub fn parse_positional(data: &[u8], delimiter: u8) -> Result<Vec<(usize, Vec<String>)>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(strip_bom(data));

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push((line, row.iter().map(|cell| cell.trim().to_string()).collect()));
    }
    Ok(rows)
}

fn cell_value(cell: Option<&str>) -> Value {
    match cell.map(str::trim) {
        Some(text) if !text.is_empty() => Value::String(text.to_string()),
        _ => Value::Null,
    }
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}
