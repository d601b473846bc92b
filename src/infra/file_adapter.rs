use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::app::ports::{RecordSink, RecordSource, SaveSummary};
use crate::error::Result;
use crate::infra::csv_table::{parse_csv_records, render_csv_records};
use crate::infra::format::DataFormat;
use crate::infra::json_records::{parse_json_records, render_json_records};
use crate::types::ScholarshipTable;

/// Parse bytes in the given format
pub fn parse_table(bytes: &[u8], format: DataFormat) -> Result<ScholarshipTable> {
    match format {
        DataFormat::Json => parse_json_records(bytes),
        DataFormat::Csv => parse_csv_records(bytes),
    }
}

/// Render a table in the given format
pub fn render_table(table: &ScholarshipTable, format: DataFormat) -> Result<Vec<u8>> {
    match format {
        DataFormat::Json => Ok(render_json_records(table)?.into_bytes()),
        DataFormat::Csv => render_csv_records(table),
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Read a table from a file, format taken from the extension unless given
pub fn read_table(path: &Path, format: Option<DataFormat>) -> Result<ScholarshipTable> {
    let format = match format {
        Some(f) => f,
        None => DataFormat::from_path(path)?,
    };
    let bytes = fs::read(path)?;
    match parse_table(&bytes, format) {
        Ok(table) => {
            crate::observability::metrics::load::succeeded(format.extension(), table.len());
            debug!("Read {} records from {}", table.len(), path.display());
            Ok(table)
        }
        Err(e) => {
            crate::observability::metrics::load::failed(format.extension());
            Err(e)
        }
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// File-backed record source (JSON or CSV)
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
    format: Option<DataFormat>,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: DataFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileRecordSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<ScholarshipTable> {
        read_table(&self.path, self.format)
    }
}

/// Source over a table that was already read, e.g. by workspace discovery
#[derive(Debug, Clone)]
pub struct LoadedRecordSource {
    origin: PathBuf,
    table: ScholarshipTable,
}

impl LoadedRecordSource {
    pub fn new(origin: impl Into<PathBuf>, table: ScholarshipTable) -> Self {
        Self {
            origin: origin.into(),
            table,
        }
    }
}

impl RecordSource for LoadedRecordSource {
    fn describe(&self) -> String {
        self.origin.display().to_string()
    }

    fn load(&self) -> Result<ScholarshipTable> {
        Ok(self.table.clone())
    }
}

/// File-backed record sink.
///
/// JSON output can be accompanied by a sample file holding the first rows.
#[derive(Debug, Clone)]
pub struct FileRecordSink {
    path: PathBuf,
    format: DataFormat,
    sample: Option<(PathBuf, usize)>,
}

impl FileRecordSink {
    pub fn new(path: impl Into<PathBuf>, format: DataFormat) -> Self {
        Self {
            path: path.into(),
            format,
            sample: None,
        }
    }

    /// Also write the first `rows` records to `path` (JSON output only)
    pub fn with_sample(mut self, path: impl Into<PathBuf>, rows: usize) -> Self {
        self.sample = Some((path.into(), rows));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for FileRecordSink {
    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.format)
    }

    fn save(&self, table: &ScholarshipTable) -> Result<SaveSummary> {
        let bytes = render_table(table, self.format)?;
        if let Err(e) = write_bytes(&self.path, &bytes) {
            crate::observability::metrics::save::failed(self.format.extension());
            return Err(e);
        }
        crate::observability::metrics::save::succeeded(self.format.extension(), bytes.len());
        info!("Saved {} cleaned scholarships to {}", table.len(), self.path.display());

        let sample_path = match (&self.sample, self.format) {
            (Some((sample_path, rows)), DataFormat::Json) => {
                let sample = render_json_records(&table.head(*rows))?;
                write_bytes(sample_path, sample.as_bytes())?;
                debug!("Wrote {}-row sample to {}", rows, sample_path.display());
                Some(sample_path.clone())
            }
            _ => None,
        };

        Ok(SaveSummary {
            path: self.path.clone(),
            format: self.format,
            records: table.len(),
            bytes: bytes.len(),
            sha256: sha256_hex(&bytes),
            sample_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_table(rows: usize) -> ScholarshipTable {
        ScholarshipTable::from_records(
            (0..rows)
                .map(|i| [("Scholarship Name", json!(format!("S{i}")))].into_iter().collect())
                .collect(),
        )
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_json_sink_writes_sample() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("Data").join("cleaned.json");
        let sample = dir.path().join("Data").join("sample.json");
        let sink = FileRecordSink::new(&out, DataFormat::Json).with_sample(&sample, 10);

        let summary = sink.save(&sample_table(12))?;
        assert_eq!(summary.records, 12);
        assert_eq!(summary.sample_path.as_deref(), Some(sample.as_path()));
        assert_eq!(summary.sha256, sha256_hex(&fs::read(&out)?));

        let reread = FileRecordSource::new(&sample).load()?;
        assert_eq!(reread.len(), 10);
        Ok(())
    }

    #[test]
    fn test_csv_sink_skips_sample() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("cleaned.csv");
        let sample = dir.path().join("sample.json");
        let sink = FileRecordSink::new(&out, DataFormat::Csv).with_sample(&sample, 10);

        let summary = sink.save(&sample_table(3))?;
        assert!(summary.sample_path.is_none());
        assert!(!sample.exists());

        let reread = FileRecordSource::new(&out).load()?;
        assert_eq!(reread, sample_table(3));
        Ok(())
    }

    #[test]
    fn test_loaded_source_returns_table() -> anyhow::Result<()> {
        let source = LoadedRecordSource::new("Data/Scholarships_data.csv", sample_table(2));
        assert_eq!(source.describe(), "Data/Scholarships_data.csv");
        assert_eq!(source.load()?, sample_table(2));
        Ok(())
    }

    #[test]
    fn test_source_rejects_unknown_extension() {
        let source = FileRecordSource::new("scholarships.xlsx");
        assert!(source.load().is_err());
    }
}
