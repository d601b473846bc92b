use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::infra::format::DataFormat;
use crate::types::ScholarshipTable;

/// Where a stage reads its records from
pub trait RecordSource {
    /// Human-readable location, used in logs and reports
    fn describe(&self) -> String;

    fn load(&self) -> Result<ScholarshipTable>;
}

/// Where a stage persists its records
pub trait RecordSink {
    fn describe(&self) -> String;

    fn save(&self, table: &ScholarshipTable) -> Result<SaveSummary>;
}

/// What a sink wrote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub path: PathBuf,
    pub format: DataFormat,
    pub records: usize,
    pub bytes: usize,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
    pub sample_path: Option<PathBuf>,
}
