use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Interchange formats for scholarship tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// JSON array of record objects
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl DataFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        ext.parse()
            .map_err(|_| PipelineError::UnsupportedFormat(path.display().to_string()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Csv => "csv",
        }
    }
}

impl FromStr for DataFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DataFormat::Json),
            "csv" => Ok(DataFormat::Csv),
            other => Err(PipelineError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
