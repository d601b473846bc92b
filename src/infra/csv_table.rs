use serde_json::Value;

use crate::constants::CSV_NA_VALUES;
use crate::error::{PipelineError, Result};
use crate::types::{display_text, ScholarshipRecord, ScholarshipTable};

/// Parse CSV with a header row into a table.
///
/// Cells stay text. Empty cells and the NA markers in [`CSV_NA_VALUES`]
/// become `null` so they count as missing fields downstream.
pub fn parse_csv_records(bytes: &[u8]) -> Result<ScholarshipTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: ScholarshipRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| {
                let value = if CSV_NA_VALUES.contains(&cell) {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (header.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok(ScholarshipTable::with_columns(headers, records))
}

/// Render a table as CSV: header row from the table columns, empty cells for
/// missing values, compact JSON for nested values.
pub fn render_csv_records(table: &ScholarshipTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;

    for record in table.records() {
        let row: Vec<String> = table
            .columns()
            .iter()
            .map(|c| record.get(c).and_then(display_text).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))
}
