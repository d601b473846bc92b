use serde_json::Value;

use crate::error::{PipelineError, Result};
use crate::types::{ScholarshipRecord, ScholarshipTable};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a JSON array of flat objects into a table.
///
/// Every element must be an object; the first one that is not is reported
/// with its index.
pub fn parse_json_records(bytes: &[u8]) -> Result<ScholarshipTable> {
    let value: Value = serde_json::from_slice(bytes)?;
    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            return Err(PipelineError::UnsupportedFormat(format!(
                "expected a JSON array of records, found {}",
                type_name(&other)
            )))
        }
    };

    let mut table = ScholarshipTable::new();
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Value::Object(map) => table.push(ScholarshipRecord::from_map(map)),
            other => {
                return Err(PipelineError::MalformedRecord {
                    index,
                    found: type_name(&other).to_string(),
                })
            }
        }
    }
    Ok(table)
}

/// Render a table as a pretty-printed JSON array of records.
///
/// Each record carries every table column, `null` where it has no value.
/// Non-ASCII text is written as-is.
pub fn render_json_records(table: &ScholarshipTable) -> Result<String> {
    let rows: Vec<Value> = table.to_row_maps().into_iter().map(Value::Object).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
