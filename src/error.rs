use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV processing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record {index} is not an object (found {found})")]
    MalformedRecord { index: usize, found: String },

    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),

    #[error("No scholarship data found under {0}")]
    DataNotFound(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
