use anyhow::{Context, Result};
use clap::Parser;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use scholarship_cleaner::constants::{ID_COLUMN, TEXT_CLEANED_COLUMN};
use scholarship_cleaner::infra::read_table;
use scholarship_cleaner::pipeline::clean_scholarship_text;
use scholarship_cleaner::types::ScholarshipTable;

/// Validate a cleaned scholarship file produced by `scholarship_cleaner clean`.
#[derive(Parser, Debug)]
#[command(name = "validate-cleaned", version, about = "Validate a cleaned scholarship dataset")]
struct Cli {
    /// Path to the cleaned JSON or CSV file
    path: PathBuf,

    /// Also fail when cleaning the cleaned text again would change it
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn check_ids(table: &ScholarshipTable, findings: &mut Findings) {
    if !table.has_column(ID_COLUMN) {
        findings.warnings.push(format!("no '{}' column", ID_COLUMN));
        return;
    }
    for (position, record) in table.records().iter().enumerate() {
        let id = record.get(ID_COLUMN);
        let matches = match id {
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(position as u64),
            // CSV cells come back as strings
            Some(serde_json::Value::String(s)) => s.parse::<usize>().ok() == Some(position),
            _ => false,
        };
        if !matches {
            findings
                .errors
                .push(format!("row {}: expected {} = {}, found {:?}", position, ID_COLUMN, position, id));
        }
    }
}

fn check_cleaned_text(table: &ScholarshipTable, strict: bool, findings: &mut Findings) {
    if !table.has_column(TEXT_CLEANED_COLUMN) {
        findings.warnings.push(format!("no '{}' column", TEXT_CLEANED_COLUMN));
        return;
    }
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (position, record) in table.records().iter().enumerate() {
        let Some(text) = record.get(TEXT_CLEANED_COLUMN).and_then(|v| v.as_str()) else {
            continue;
        };
        match first_seen.entry(text) {
            Entry::Occupied(first) => {
                findings
                    .errors
                    .push(format!("row {}: cleaned text duplicates row {}", position, first.get()));
            }
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
        }
        if clean_scholarship_text(text) != text {
            let message = format!("row {}: cleaned text changes when cleaned again", position);
            if strict {
                findings.errors.push(message);
            } else {
                findings.warnings.push(message);
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let table = read_table(&args.path, None)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    let mut findings = Findings::default();
    check_ids(&table, &mut findings);
    check_cleaned_text(&table, args.strict, &mut findings);

    for warning in &findings.warnings {
        eprintln!("warning: {}", warning);
    }
    if findings.errors.is_empty() {
        println!("valid ({} records)", table.len());
        Ok(())
    } else {
        eprintln!("invalid:");
        for error in &findings.errors {
            eprintln!("- {}", error);
        }
        std::process::exit(1)
    }
}
