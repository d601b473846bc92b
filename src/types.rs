use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One scholarship opportunity: an ordered mapping from field name to value.
///
/// Records are schema-less. The recognized fields (see
/// [`crate::constants::RECOGNIZED_FIELDS`]) are read optionally, everything
/// else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScholarshipRecord {
    fields: Map<String, Value>,
}

impl ScholarshipRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Value of a field, `None` when the key is missing.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Value of a field when it is present and not null
    pub fn present(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set a field. New keys are appended after the existing ones.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for ScholarshipRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ScholarshipRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Display text of a field value.
///
/// Strings are taken verbatim; numbers use their JSON display and booleans
/// render as `True`/`False`;
/// arrays and objects are rendered as compact JSON. `null` has no display text.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

static NULL: Value = Value::Null;

/// An ordered table of records with a column list, the in-memory shape the
/// loaders produce and the writers consume.
///
/// Columns are the union of the record keys in first-seen order. A column
/// existing in the table does not mean every record carries it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScholarshipTable {
    columns: Vec<String>,
    records: Vec<ScholarshipRecord>,
}

impl ScholarshipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records, deriving the column list from their keys.
    pub fn from_records(records: Vec<ScholarshipRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.push(record);
        }
        table
    }

    /// Build a table with an explicit column order (e.g. a CSV header).
    /// Keys found on records but missing from `columns` are appended.
    pub fn with_columns(columns: Vec<String>, records: Vec<ScholarshipRecord>) -> Self {
        let mut table = Self {
            columns,
            records: Vec::with_capacity(records.len()),
        };
        for record in records {
            table.push(record);
        }
        table
    }

    pub fn push(&mut self, record: ScholarshipRecord) {
        for key in record.keys() {
            if !self.has_column(key) {
                self.columns.push(key.to_string());
            }
        }
        self.records.push(record);
    }

    /// Register a column without touching any record
    pub fn add_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[ScholarshipRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<ScholarshipRecord> {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<ScholarshipRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of one column across all rows, `Value::Null` where a record lacks it
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records
            .iter()
            .map(move |r| r.get(column).unwrap_or(&NULL))
    }

    /// First `n` rows as a new table with the same columns
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    /// Rows expanded to every table column, `null` filling the gaps.
    pub fn to_row_maps(&self) -> Vec<Map<String, Value>> {
        self.records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|c| (c.clone(), record.get(c).cloned().unwrap_or(Value::Null)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ScholarshipRecord {
        match value {
            Value::Object(map) => ScholarshipRecord::from_map(map),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_present_skips_null() {
        let r = record(json!({"Provider": null, "Country": "Germany"}));
        assert!(r.contains("Provider"));
        assert!(r.present("Provider").is_none());
        assert_eq!(r.present("Country"), Some(&json!("Germany")));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&json!("x")), Some("x".to_string()));
        assert_eq!(display_text(&json!(2024)), Some("2024".to_string()));
        assert_eq!(display_text(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(display_text(&json!(true)), Some("True".to_string()));
        assert_eq!(display_text(&json!(false)), Some("False".to_string()));
        assert_eq!(display_text(&json!(["a", "b"])), Some("[\"a\",\"b\"]".to_string()));
        assert_eq!(display_text(&Value::Null), None);
    }

    #[test]
    fn test_table_columns_follow_first_seen_order() {
        let table = ScholarshipTable::from_records(vec![
            record(json!({"b": 1, "a": 2})),
            record(json!({"a": 3, "c": 4})),
        ]);
        assert_eq!(table.columns(), &["b", "a", "c"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_row_maps_fill_missing_with_null() {
        let table = ScholarshipTable::from_records(vec![
            record(json!({"a": 1})),
            record(json!({"b": 2})),
        ]);
        let rows = table.to_row_maps();
        assert_eq!(Value::Object(rows[0].clone()), json!({"a": 1, "b": null}));
        assert_eq!(Value::Object(rows[1].clone()), json!({"a": null, "b": 2}));
        let keys: Vec<_> = rows[1].keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_explicit_columns_keep_header_order() {
        let table = ScholarshipTable::with_columns(
            vec!["z".to_string(), "y".to_string()],
            vec![record(json!({"y": 1, "x": 2}))],
        );
        assert_eq!(table.columns(), &["z", "y", "x"]);
    }
}
