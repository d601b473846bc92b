use std::collections::HashSet;

use crate::types::ScholarshipRecord;

/// Drop records whose `column` value (as a string) was already seen.
///
/// Keep-first and stable: surviving records keep their relative input order.
/// Records without a string value in `column` are never treated as
/// duplicates. Returns the survivors and the number of records removed.
pub fn deduplicate_on_column(
    records: Vec<ScholarshipRecord>,
    column: &str,
) -> (Vec<ScholarshipRecord>, usize) {
    let initial = records.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(initial);

    let unique: Vec<ScholarshipRecord> = records
        .into_iter()
        .filter(|record| match record.get(column).and_then(|v| v.as_str()) {
            Some(key) => seen.insert(key.to_string()),
            None => true,
        })
        .collect();

    let removed = initial - unique.len();
    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn keyed(key: Value, tag: i64) -> ScholarshipRecord {
        [("k", key), ("tag", json!(tag))].into_iter().collect()
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let records = vec![
            keyed(json!("a"), 0),
            keyed(json!("b"), 1),
            keyed(json!("a"), 2),
            keyed(json!("c"), 3),
            keyed(json!("b"), 4),
        ];
        let (unique, removed) = deduplicate_on_column(records, "k");
        let tags: Vec<_> = unique.iter().map(|r| r.get("tag").cloned().unwrap()).collect();
        assert_eq!(tags, vec![json!(0), json!(1), json!(3)]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_records_without_key_survive() {
        let records = vec![keyed(Value::Null, 0), keyed(Value::Null, 1), ScholarshipRecord::new()];
        let (unique, removed) = deduplicate_on_column(records, "k");
        assert_eq!(unique.len(), 3);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_empty_strings_collapse() {
        let records = vec![keyed(json!(""), 0), keyed(json!(""), 1)];
        let (unique, removed) = deduplicate_on_column(records, "k");
        assert_eq!(unique.len(), 1);
        assert_eq!(removed, 1);
    }
}
