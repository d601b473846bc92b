//! Dataset profile: key counts, per-column completeness, duplicate rows,
//! top providers/countries/programs, Eligibility text lengths and the
//! deadline timeline.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{COUNTRY, DEADLINE, ELIGIBILITY, PROGRAM, PROVIDER};
use crate::types::{display_text, ScholarshipTable};

pub const TOP_PROGRAMS: usize = 20;
pub const TOP_PROVIDERS: usize = 20;
pub const TOP_COUNTRIES: usize = 15;

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub non_null: usize,
    pub nulls: usize,
    pub distinct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValues {
    pub column: String,
    pub count: usize,
    /// Share of rows missing the value, in percent, rounded to 2 decimals
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLengthStats {
    pub mean_chars: f64,
    pub median_chars: f64,
    pub max_chars: usize,
    pub mean_words: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub total_rows: usize,
    pub unique_providers: Option<usize>,
    pub unique_countries: Option<usize>,
    pub unique_programs: Option<usize>,
    pub columns: Vec<ColumnProfile>,
    pub missing: Vec<MissingValues>,
    pub duplicate_rows: usize,
    pub missing_eligibility: Option<usize>,
    pub top_programs: Vec<ValueCount>,
    pub top_providers: Vec<ValueCount>,
    pub top_countries: Vec<ValueCount>,
    pub eligibility_length: Option<TextLengthStats>,
    pub deadline_timeline: Vec<MonthCount>,
    pub unparsed_deadlines: usize,
}

/// Profile a table. Pure; charts are left to the caller.
pub fn profile(table: &ScholarshipTable) -> DatasetOverview {
    let total_rows = table.len();
    let columns: Vec<ColumnProfile> = table
        .columns()
        .iter()
        .map(|c| profile_column(table, c))
        .collect();

    let missing = columns
        .iter()
        .filter(|c| c.nulls > 0)
        .map(|c| MissingValues {
            column: c.name.clone(),
            count: c.nulls,
            percent: round2(c.nulls as f64 * 100.0 / total_rows.max(1) as f64),
        })
        .collect();

    let distinct_of = |name: &str| columns.iter().find(|c| c.name == name).map(|c| c.distinct);
    let nulls_of = |name: &str| columns.iter().find(|c| c.name == name).map(|c| c.nulls);

    let (deadline_timeline, unparsed_deadlines) = deadlines_by_month(table);

    DatasetOverview {
        total_rows,
        unique_providers: distinct_of(PROVIDER),
        unique_countries: distinct_of(COUNTRY),
        unique_programs: distinct_of(PROGRAM),
        duplicate_rows: duplicate_rows(table),
        missing_eligibility: nulls_of(ELIGIBILITY),
        top_programs: top_values(
            table
                .column_values(PROGRAM)
                .filter_map(display_text)
                .flat_map(|p| p.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>())
                .filter(|p| !p.is_empty()),
            TOP_PROGRAMS,
        ),
        top_providers: top_values(table.column_values(PROVIDER).filter_map(display_text), TOP_PROVIDERS),
        top_countries: top_values(table.column_values(COUNTRY).filter_map(display_text), TOP_COUNTRIES),
        eligibility_length: text_length_stats(table.column_values(ELIGIBILITY).filter_map(display_text)),
        columns,
        missing,
        deadline_timeline,
        unparsed_deadlines,
    }
}

fn profile_column(table: &ScholarshipTable, name: &str) -> ColumnProfile {
    let mut non_null = 0;
    let mut distinct: HashSet<String> = HashSet::new();
    for value in table.column_values(name).filter(|v| !v.is_null()) {
        non_null += 1;
        distinct.insert(value.to_string());
    }
    ColumnProfile {
        name: name.to_string(),
        non_null,
        nulls: table.len() - non_null,
        distinct: distinct.len(),
    }
}

/// Rows equal in every column to an earlier row
fn duplicate_rows(table: &ScholarshipTable) -> usize {
    let mut seen = HashSet::with_capacity(table.len());
    table
        .to_row_maps()
        .into_iter()
        .filter(|row| !seen.insert(Value::Object(row.clone()).to_string()))
        .count()
}

/// Most frequent values, count descending, ties in order of first appearance
fn top_values(values: impl Iterator<Item = String>, limit: usize) -> Vec<ValueCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push(ValueCount { value, count: 1 });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

fn text_length_stats(texts: impl Iterator<Item = String>) -> Option<TextLengthStats> {
    let mut lengths = Vec::new();
    let mut words = 0usize;
    for text in texts {
        lengths.push(text.chars().count());
        words += text.split_whitespace().count();
    }
    if lengths.is_empty() {
        return None;
    }
    let n = lengths.len() as f64;
    let mean_chars = lengths.iter().sum::<usize>() as f64 / n;
    let max_chars = lengths.iter().copied().max().unwrap_or(0);
    lengths.sort_unstable();
    let mid = lengths.len() / 2;
    let median_chars = if lengths.len() % 2 == 0 {
        (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
    } else {
        lengths[mid] as f64
    };
    Some(TextLengthStats {
        mean_chars,
        median_chars,
        max_chars,
        mean_words: words as f64 / n,
    })
}

/// Parse a deadline in one of the common formats found in the data
pub fn parse_deadline(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Deadlines per month (ascending) and the number of deadlines that did not parse
fn deadlines_by_month(table: &ScholarshipTable) -> (Vec<MonthCount>, usize) {
    let mut months: HashMap<String, usize> = HashMap::new();
    let mut unparsed = 0;
    for text in table.column_values(DEADLINE).filter_map(display_text) {
        match parse_deadline(&text) {
            Some(date) => *months.entry(date.format("%Y-%m").to_string()).or_insert(0) += 1,
            None => unparsed += 1,
        }
    }
    let mut timeline: Vec<MonthCount> = months
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect();
    timeline.sort_by(|a, b| a.month.cmp(&b.month));
    (timeline, unparsed)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
