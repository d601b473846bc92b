use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app::ports::{RecordSink, RecordSource, SaveSummary};
use crate::error::Result;
use crate::pipeline::clean::{clean_and_deduplicate, CleaningOptions, CleaningReport};

/// Outcome of one load → clean → save run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source: String,
    pub cleaning: CleaningReport,
    pub saved: SaveSummary,
}

/// Use case for the cleaning stage: read raw records, clean them, persist
/// the cleaned table for the next stage
pub struct CleanUseCase {
    source: Box<dyn RecordSource>,
    sink: Box<dyn RecordSink>,
    options: CleaningOptions,
}

impl CleanUseCase {
    pub fn new(source: Box<dyn RecordSource>, sink: Box<dyn RecordSink>, options: CleaningOptions) -> Self {
        Self { source, sink, options }
    }

    pub fn run(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("clean_run", run_id = %run_id);
        let _enter = span.enter();
        let started_at = Utc::now();

        info!("Loading raw scholarships from {}", self.source.describe());
        let raw = self.source.load()?;
        info!("Raw data loaded: {} scholarships", raw.len());

        let outcome = clean_and_deduplicate(&raw, &self.options);

        info!("Saving cleaned scholarships to {}", self.sink.describe());
        let saved = self.sink.save(&outcome.table)?;

        Ok(RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            source: self.source.describe(),
            cleaning: outcome.report,
            saved,
        })
    }
}
