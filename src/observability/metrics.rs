//! Metrics for the cleaning pipeline
//!
//! Recording goes through the `metrics` facade, so every call is a no-op
//! until [`init`] installs the Prometheus recorder. The recorder has no HTTP
//! listener: a batch run renders its metrics once at the end via [`render`].

use std::fmt;
use std::sync::OnceLock;

use tracing::{info, warn};

static HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// All metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Load metrics
    LoadSuccess,
    LoadError,
    LoadRecords,

    // Clean metrics
    CleanBatchesProcessed,
    CleanRecordsIn,
    CleanRecordsOut,
    CleanDuplicatesRemoved,
    CleanAvgTextLength,
    CleanDuration,

    // Save metrics
    SaveSuccess,
    SaveError,
    SaveBytes,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LoadSuccess => "scholarship_load_success_total",
            MetricName::LoadError => "scholarship_load_error_total",
            MetricName::LoadRecords => "scholarship_load_records_total",

            MetricName::CleanBatchesProcessed => "scholarship_clean_batches_processed_total",
            MetricName::CleanRecordsIn => "scholarship_clean_records_in_total",
            MetricName::CleanRecordsOut => "scholarship_clean_records_out_total",
            MetricName::CleanDuplicatesRemoved => "scholarship_clean_duplicates_removed_total",
            MetricName::CleanAvgTextLength => "scholarship_clean_avg_text_length",
            MetricName::CleanDuration => "scholarship_clean_duration_seconds",

            MetricName::SaveSuccess => "scholarship_save_success_total",
            MetricName::SaveError => "scholarship_save_error_total",
            MetricName::SaveBytes => "scholarship_save_bytes",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            LoadSuccess,
            LoadError,
            LoadRecords,
            CleanBatchesProcessed,
            CleanRecordsIn,
            CleanRecordsOut,
            CleanDuplicatesRemoved,
            CleanAvgTextLength,
            CleanDuration,
            SaveSuccess,
            SaveError,
            SaveBytes,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus recorder. Idempotent.
pub fn init() {
    if HANDLE.get().is_some() {
        return;
    }
    match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Metrics handle already set");
            }
            info!("Metrics recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    }
}

/// Prometheus text rendering of everything recorded so far
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

pub mod load {
    use super::MetricName;

    pub fn succeeded(format: &str, records: usize) {
        ::metrics::counter!(MetricName::LoadSuccess.as_str(), "format" => format.to_string()).increment(1);
        ::metrics::counter!(MetricName::LoadRecords.as_str()).increment(records as u64);
    }

    pub fn failed(format: &str) {
        ::metrics::counter!(MetricName::LoadError.as_str(), "format" => format.to_string()).increment(1);
    }
}

pub mod clean {
    use super::MetricName;
    use crate::pipeline::clean::CleaningReport;

    /// Record the outcome of one `clean_and_deduplicate` call
    pub fn batch_cleaned(report: &CleaningReport, duration_secs: f64) {
        ::metrics::counter!(MetricName::CleanBatchesProcessed.as_str()).increment(1);
        ::metrics::counter!(MetricName::CleanRecordsIn.as_str()).increment(report.input_rows as u64);
        ::metrics::counter!(MetricName::CleanRecordsOut.as_str()).increment(report.output_rows as u64);
        ::metrics::counter!(MetricName::CleanDuplicatesRemoved.as_str())
            .increment(report.duplicates_removed as u64);
        if let Some(avg) = report.avg_cleaned_length {
            ::metrics::gauge!(MetricName::CleanAvgTextLength.as_str()).set(avg);
        }
        ::metrics::histogram!(MetricName::CleanDuration.as_str()).record(duration_secs);
    }
}

pub mod save {
    use super::MetricName;

    pub fn succeeded(format: &str, bytes: usize) {
        ::metrics::counter!(MetricName::SaveSuccess.as_str(), "format" => format.to_string()).increment(1);
        ::metrics::histogram!(MetricName::SaveBytes.as_str()).record(bytes as f64);
    }

    pub fn failed(format: &str) {
        ::metrics::counter!(MetricName::SaveError.as_str(), "format" => format.to_string()).increment(1);
    }
}
