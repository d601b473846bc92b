//! Scholarship text building and cleaning rules
//!
//! `build_scholarship_text` folds the recognized fields of a record into one
//! text block; `clean_scholarship_text` strips contact details, markup and
//! layout noise from it. The cleaned text doubles as the deduplication key,
//! so the rule order below is part of the contract: changing it changes
//! which records collapse together.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::constants::RECOGNIZED_FIELDS;
use crate::types::{display_text, ScholarshipRecord};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| compile(r"\S+@\S+"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| compile(r"\+?\d[\d\-\s\(\)]{7,}\d"));
static URL_RE: Lazy<Regex> = Lazy::new(|| compile(r"https?://\S+|www\.\S+"));
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| compile(r"<[^>]+>"));
static HTML_ENTITY_RE: Lazy<Regex> = Lazy::new(|| compile(r"&[a-z]+;"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| compile(r"[•●▪■◆▶►▸⦿⦾]"));
static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| compile(r" {2,}"));
static EXCESS_NEWLINES_RE: Lazy<Regex> = Lazy::new(|| compile(r"\n{3,}"));

// Zero-width space, ZWNJ, ZWJ, word joiner, byte-order mark
const INVISIBLE_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

fn compile(pattern: &str) -> Regex {
    // Patterns are literals in this file; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid cleaning pattern {pattern:?}: {e}"))
}

/// Combine the recognized fields of a record into one text block.
///
/// Each present field becomes `"<Field>:\n<value>"`; blocks are joined with a
/// newline in the fixed field order. Missing and null fields are skipped
/// without a placeholder.
pub fn build_scholarship_text(record: &ScholarshipRecord) -> String {
    RECOGNIZED_FIELDS
        .iter()
        .filter_map(|field| {
            record
                .present(field)
                .and_then(display_text)
                .map(|value| format!("{field}:\n{value}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean a field value. Only strings are cleaned; anything else yields `""`.
pub fn clean_value(value: &Value) -> String {
    match value {
        Value::String(text) => clean_scholarship_text(text),
        _ => String::new(),
    }
}

/// Apply the noise-removal and whitespace rules to `text` in a single pass.
pub fn clean_scholarship_text(text: &str) -> String {
    // Compatibility decomposition only. Combining marks stay separate from
    // their base characters; downstream dedup results depend on this.
    let mut text: String = text
        .nfkd()
        .filter(|c| !INVISIBLE_CHARS.contains(c))
        .collect();

    text = EMAIL_RE.replace_all(&text, " ").into_owned();
    text = PHONE_RE.replace_all(&text, " ").into_owned();
    text = URL_RE.replace_all(&text, " ").into_owned();
    text = HTML_TAG_RE.replace_all(&text, " ").into_owned();
    text = HTML_ENTITY_RE.replace_all(&text, " ").into_owned();
    text = BULLET_RE.replace_all(&text, "- ").into_owned();
    text = text.replace(['–', '—'], "-").replace('\t', " ");
    text = MULTI_SPACE_RE.replace_all(&text, " ").into_owned();

    text = collapse_blank_lines(&text);
    text = EXCESS_NEWLINES_RE.replace_all(&text, "\n\n").into_owned();

    text.trim().to_string()
}

/// Trim every line and keep at most one blank line per run of blank lines.
fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_seen = false;

    for line in text.split('\n').map(str::trim) {
        if line.is_empty() {
            if !blank_seen {
                lines.push("");
            }
            blank_seen = true;
        } else {
            lines.push(line);
            blank_seen = false;
        }
    }

    lines.join("\n")
}
