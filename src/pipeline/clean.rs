use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::constants::{ELIGIBILITY, ID_COLUMN, TEXT_CLEANED_COLUMN, TEXT_RAW_COLUMN};
use crate::pipeline::processing::dedup::deduplicate_on_column;
use crate::pipeline::processing::text::{build_scholarship_text, clean_value};
use crate::types::ScholarshipTable;

/// Which cleaning steps to run. Every step is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// Attach `scholarship_text_raw` to every record
    pub combine_text: bool,
    /// Attach `scholarship_text_cleaned`
    pub apply_text_cleaning: bool,
    /// Drop records whose cleaned text repeats an earlier record's
    pub deduplicate_on_cleaned_text: bool,
    /// Attach `scholarship_id` as the final row position
    pub assign_id: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            combine_text: true,
            apply_text_cleaning: true,
            deduplicate_on_cleaned_text: true,
            assign_id: true,
        }
    }
}

/// Column the cleaned text was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    CombinedText,
    Eligibility,
}

impl TextSource {
    pub fn column(&self) -> &'static str {
        match self {
            TextSource::CombinedText => TEXT_RAW_COLUMN,
            TextSource::Eligibility => ELIGIBILITY,
        }
    }
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Summary of one cleaning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub duplicates_removed: usize,
    pub columns_added: usize,
    pub text_source: Option<TextSource>,
    /// Mean length of the cleaned text in characters
    pub avg_cleaned_length: Option<f64>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: ScholarshipTable,
    pub report: CleaningReport,
}

/// Derive the cleaned table from `source` without modifying it.
///
/// Steps run in a fixed order: combine the recognized fields into raw text,
/// clean it (falling back to the Eligibility column when no raw text was
/// built), drop records with repeated cleaned text keeping the first, then
/// number the survivors from zero.
pub fn clean_and_deduplicate(source: &ScholarshipTable, options: &CleaningOptions) -> CleaningOutcome {
    let started = Instant::now();
    let mut table = source.clone();
    let mut steps = Vec::new();
    let input_rows = table.len();

    if options.combine_text {
        for record in table.records_mut().iter_mut() {
            let raw = build_scholarship_text(record);
            record.insert(TEXT_RAW_COLUMN, Value::String(raw));
        }
        table.add_column(TEXT_RAW_COLUMN);
        debug!("Combined text into '{}'", TEXT_RAW_COLUMN);
        steps.push(format!("combined text into '{}'", TEXT_RAW_COLUMN));
    }

    let mut text_source = None;
    if options.apply_text_cleaning {
        text_source = if table.has_column(TEXT_RAW_COLUMN) {
            Some(TextSource::CombinedText)
        } else if table.has_column(ELIGIBILITY) {
            Some(TextSource::Eligibility)
        } else {
            None
        };

        match text_source {
            Some(src) => {
                let column = src.column();
                for record in table.records_mut().iter_mut() {
                    let cleaned = record.get(column).map(clean_value).unwrap_or_default();
                    record.insert(TEXT_CLEANED_COLUMN, Value::String(cleaned));
                }
                table.add_column(TEXT_CLEANED_COLUMN);
                debug!("Cleaned text from '{}' into '{}'", column, TEXT_CLEANED_COLUMN);
                steps.push(format!("cleaned '{}' into '{}'", column, TEXT_CLEANED_COLUMN));
            }
            None => {
                info!("No text column to clean; skipping text cleaning");
            }
        }
    }

    let mut duplicates_removed = 0;
    if options.deduplicate_on_cleaned_text && table.has_column(TEXT_CLEANED_COLUMN) {
        let columns = table.columns().to_vec();
        let (unique, removed) = deduplicate_on_column(table.into_records(), TEXT_CLEANED_COLUMN);
        table = ScholarshipTable::with_columns(columns, unique);
        duplicates_removed = removed;
        info!(
            "Deduplicated: reduced from {} to {} unique scholarships",
            input_rows,
            table.len()
        );
        steps.push(format!("removed {} duplicates on '{}'", removed, TEXT_CLEANED_COLUMN));
    }

    if options.assign_id {
        for (position, record) in table.records_mut().iter_mut().enumerate() {
            record.insert(ID_COLUMN, Value::from(position as u64));
        }
        table.add_column(ID_COLUMN);
        steps.push(format!("assigned '{}'", ID_COLUMN));
    }

    let avg_cleaned_length = average_length(&table, TEXT_CLEANED_COLUMN);
    let report = CleaningReport {
        input_rows,
        output_rows: table.len(),
        duplicates_removed,
        columns_added: table.columns().len().saturating_sub(source.columns().len()),
        text_source,
        avg_cleaned_length,
        steps,
    };

    crate::observability::metrics::clean::batch_cleaned(&report, started.elapsed().as_secs_f64());
    info!(
        input = report.input_rows,
        output = report.output_rows,
        duplicates = report.duplicates_removed,
        "Cleaning complete"
    );

    CleaningOutcome { table, report }
}

/// Mean character length of a string column, `None` if the column is absent or empty
fn average_length(table: &ScholarshipTable, column: &str) -> Option<f64> {
    if !table.has_column(column) || table.is_empty() {
        return None;
    }
    let lengths: Vec<usize> = table
        .column_values(column)
        .filter_map(|v| v.as_str())
        .map(|s| s.chars().count())
        .collect();
    if lengths.is_empty() {
        return None;
    }
    Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScholarshipRecord;
    use serde_json::json;

    fn table(rows: Value) -> ScholarshipTable {
        let records = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| ScholarshipRecord::from_map(r.as_object().unwrap().clone()))
            .collect();
        ScholarshipTable::from_records(records)
    }

    #[test]
    fn test_end_to_end_duplicate_pair() {
        let input = table(json!([
            {"Scholarship Name": "A", "Eligibility": "Email: x@y.com   see   www.foo.com"},
            {"Scholarship Name": "A", "Eligibility": "Email: x@y.com   see   www.foo.com"}
        ]));
        let outcome = clean_and_deduplicate(&input, &CleaningOptions::default());

        assert_eq!(outcome.table.len(), 1);
        let record = &outcome.table.records()[0];
        assert_eq!(record.get(ID_COLUMN), Some(&json!(0)));
        let cleaned = record.get(TEXT_CLEANED_COLUMN).and_then(|v| v.as_str()).unwrap();
        assert!(!cleaned.contains('@'));
        assert!(!cleaned.contains("www."));
        assert_eq!(cleaned, "Scholarship Name:\nA\nEligibility:\nEmail: see");
        assert_eq!(outcome.report.duplicates_removed, 1);
    }

    #[test]
    fn test_ids_follow_first_occurrences() {
        let input = table(json!([
            {"Scholarship Name": "One"},
            {"Scholarship Name": "Two"},
            {"Scholarship Name": "One"},
            {"Scholarship Name": "Three"},
            {"Scholarship Name": "Four"}
        ]));
        let outcome = clean_and_deduplicate(&input, &CleaningOptions::default());

        let names: Vec<_> = outcome
            .table
            .records()
            .iter()
            .map(|r| r.get("Scholarship Name").cloned().unwrap())
            .collect();
        let ids: Vec<_> = outcome
            .table
            .records()
            .iter()
            .map(|r| r.get(ID_COLUMN).cloned().unwrap())
            .collect();
        assert_eq!(names, vec![json!("One"), json!("Two"), json!("Three"), json!("Four")]);
        assert_eq!(ids, vec![json!(0), json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_whitespace_noise_collapses_to_one_record() {
        let input = table(json!([
            {"Scholarship Name": "Global Merit", "Benefits": "Full   tuition\t\n\n\n\nstipend"},
            {"Scholarship Name": "  Global Merit  ", "Benefits": "Full tuition\n\nstipend  "}
        ]));
        let outcome = clean_and_deduplicate(&input, &CleaningOptions::default());
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(
            outcome.table.records()[0].get("Benefits"),
            Some(&json!("Full   tuition\t\n\n\n\nstipend"))
        );
    }

    #[test]
    fn test_source_table_is_untouched() {
        let input = table(json!([{"Scholarship Name": "A"}, {"Scholarship Name": "A"}]));
        let before = input.clone();
        let _ = clean_and_deduplicate(&input, &CleaningOptions::default());
        assert_eq!(input, before);
    }

    #[test]
    fn test_falls_back_to_eligibility_without_combined_text() {
        let input = table(json!([
            {"Scholarship Name": "A", "Eligibility": "Open  to\tall"},
            {"Scholarship Name": "B"}
        ]));
        let options = CleaningOptions { combine_text: false, ..CleaningOptions::default() };
        let outcome = clean_and_deduplicate(&input, &options);

        assert_eq!(outcome.report.text_source, Some(TextSource::Eligibility));
        let records = outcome.table.records();
        assert!(records[0].get(TEXT_RAW_COLUMN).is_none());
        assert_eq!(records[0].get(TEXT_CLEANED_COLUMN), Some(&json!("Open to all")));
        assert_eq!(records[1].get(TEXT_CLEANED_COLUMN), Some(&json!("")));
    }

    #[test]
    fn test_no_source_column_means_no_cleaned_text_and_no_dedup() {
        let input = table(json!([{"Provider": "X"}, {"Provider": "X"}]));
        let options = CleaningOptions { combine_text: false, ..CleaningOptions::default() };
        let outcome = clean_and_deduplicate(&input, &options);

        assert_eq!(outcome.report.text_source, None);
        assert!(!outcome.table.has_column(TEXT_CLEANED_COLUMN));
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.report.duplicates_removed, 0);
        assert_eq!(outcome.report.avg_cleaned_length, None);
    }

    #[test]
    fn test_all_options_off_returns_copy() {
        let input = table(json!([{"Provider": "X"}, {"Provider": "X"}]));
        let options = CleaningOptions {
            combine_text: false,
            apply_text_cleaning: false,
            deduplicate_on_cleaned_text: false,
            assign_id: false,
        };
        let outcome = clean_and_deduplicate(&input, &options);
        assert_eq!(outcome.table, input);
        assert!(outcome.report.steps.is_empty());
        assert_eq!(outcome.report.columns_added, 0);
    }

    #[test]
    fn test_raw_text_kept_without_cleaning() {
        let input = table(json!([{"Country": "Chile", "extra": 1}]));
        let options = CleaningOptions { apply_text_cleaning: false, ..CleaningOptions::default() };
        let outcome = clean_and_deduplicate(&input, &options);

        let record = &outcome.table.records()[0];
        assert_eq!(record.get(TEXT_RAW_COLUMN), Some(&json!("Country:\nChile")));
        assert_eq!(record.get("extra"), Some(&json!(1)));
        assert_eq!(
            outcome.table.columns(),
            &["Country", "extra", TEXT_RAW_COLUMN, ID_COLUMN]
        );
        assert_eq!(outcome.report.columns_added, 2);
    }

    #[test]
    fn test_report_average_length() {
        let input = table(json!([{"Eligibility": "ab"}, {"Eligibility": "abcd"}]));
        let options = CleaningOptions { combine_text: false, ..CleaningOptions::default() };
        let outcome = clean_and_deduplicate(&input, &options);
        assert_eq!(outcome.report.avg_cleaned_length, Some(3.0));
    }

    #[test]
    fn test_csv_na_providers_collapse_to_one_record() {
        let csv = "Scholarship Name,Provider,Eligibility\nA,N/A,Open\nA,NaN,Open\nA,,Open\n";
        let input = crate::infra::csv_table::parse_csv_records(csv.as_bytes()).unwrap();
        let outcome = clean_and_deduplicate(&input, &CleaningOptions::default());

        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.report.duplicates_removed, 2);
        let record = &outcome.table.records()[0];
        assert_eq!(
            record.get(TEXT_RAW_COLUMN),
            Some(&json!("Scholarship Name:\nA\nEligibility:\nOpen"))
        );
        assert_eq!(record.get("Provider"), Some(&Value::Null));
    }
}
