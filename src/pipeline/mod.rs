// Cleaning pipeline: pure batch transforms over an in-memory table

pub mod clean;
pub mod processing;

// Re-export key types and functions
pub use clean::{clean_and_deduplicate, CleaningOptions, CleaningOutcome, CleaningReport, TextSource};
pub use processing::overview::{profile, DatasetOverview};
pub use processing::text::{build_scholarship_text, clean_scholarship_text, clean_value};
