//! Workspace layout and data discovery
//!
//! The workspace root is passed in explicitly; nothing here reads global
//! state. Candidate files are tried in order and the first one that loads
//! wins. Files that exist but fail to parse are logged and skipped.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::constants::{
    ANALYSIS_DATA_CANDIDATES, DATA_DIR, RAW_DATA_CANDIDATES, SAMPLE_OUTPUT_FILENAME,
};
use crate::error::{PipelineError, Result};
use crate::infra::read_table;
use crate::types::ScholarshipTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Path of a file in the `Data` directory
    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.data_dir().join(filename)
    }

    pub fn sample_path(&self) -> PathBuf {
        self.output_path(SAMPLE_OUTPUT_FILENAME)
    }

    /// Load the first raw dataset found for the cleaning stage
    pub fn load_raw_data(&self) -> Result<(PathBuf, ScholarshipTable)> {
        self.load_first(&RAW_DATA_CANDIDATES)
    }

    /// Load the first dataset found for the overview stage
    pub fn load_analysis_data(&self) -> Result<(PathBuf, ScholarshipTable)> {
        self.load_first(&ANALYSIS_DATA_CANDIDATES)
    }

    /// Paths of the candidates that currently exist, in priority order
    pub fn existing_candidates(&self, candidates: &[&str]) -> Vec<PathBuf> {
        candidates
            .iter()
            .map(|c| self.root.join(c))
            .filter(|p| p.is_file())
            .collect()
    }

    fn load_first(&self, candidates: &[&str]) -> Result<(PathBuf, ScholarshipTable)> {
        for path in self.existing_candidates(candidates) {
            match read_table(&path, None) {
                Ok(table) => {
                    info!("Loaded {} records from {}", table.len(), path.display());
                    return Ok((path, table));
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }
        Err(PipelineError::DataNotFound(self.root.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_prefers_csv_over_json() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Data"))?;
        fs::write(dir.path().join("Data/Scholarships_data.csv"), "Provider\nA\nB\n")?;
        fs::write(dir.path().join("combined_scholarships.json"), r#"[{"Provider": "C"}]"#)?;

        let (path, table) = Workspace::new(dir.path()).load_raw_data()?;
        assert!(path.ends_with("Data/Scholarships_data.csv"));
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn test_skips_unreadable_candidate() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("scraps"))?;
        fs::write(dir.path().join("scraps/combined_scholarships.json"), "{ broken")?;
        fs::write(dir.path().join("combined_scholarships.json"), r#"[{"Provider": "C"}]"#)?;

        let (path, table) = Workspace::new(dir.path()).load_raw_data()?;
        assert_eq!(path, dir.path().join("combined_scholarships.json"));
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_data_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let err = Workspace::new(dir.path()).load_raw_data().unwrap_err();
        assert!(matches!(err, PipelineError::DataNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_output_paths_live_in_data_dir() {
        let ws = Workspace::new("/srv/workspace");
        assert_eq!(ws.output_path("out.json"), PathBuf::from("/srv/workspace/Data/out.json"));
        assert_eq!(
            ws.sample_path(),
            PathBuf::from("/srv/workspace/Data/cleaned_scholarships_sample.json")
        );
    }
}
