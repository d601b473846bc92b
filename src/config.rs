use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_OUTPUT_FILENAME, DEFAULT_SAMPLE_SIZE, WORKSPACE_ENV_VAR};
use crate::error::{PipelineError, Result};
use crate::infra::format::DataFormat;
use crate::pipeline::clean::CleaningOptions;
use crate::workspace::Workspace;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Settings from `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspace: WorkspaceConfig,
    pub cleaning: CleaningOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("workspace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format; inferred from `filename` when unset
    pub format: Option<DataFormat>,
    pub filename: String,
    pub write_sample: bool,
    pub sample_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            write_sample: true,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Config {
    /// Load the config file if it exists, defaults otherwise.
    /// The workspace root can be overridden through the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                PipelineError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(root) = std::env::var(WORKSPACE_ENV_VAR) {
            if !root.trim().is_empty() {
                config.workspace.root = PathBuf::from(root);
            }
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.output.filename.trim().is_empty() {
            return Err(PipelineError::Config("output.filename must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(&self.workspace.root)
    }

    /// Output format: explicit setting first, then the filename extension
    pub fn output_format(&self) -> Result<DataFormat> {
        match self.output.format {
            Some(format) => Ok(format),
            None => DataFormat::from_path(Path::new(&self.output.filename)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cleaning, CleaningOptions::default());
        assert_eq!(config.output_format().unwrap(), DataFormat::Json);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [workspace]
            root = "/data/scholarships"

            [cleaning]
            deduplicate_on_cleaned_text = false

            [output]
            filename = "cleaned.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.workspace.root, PathBuf::from("/data/scholarships"));
        assert!(config.cleaning.combine_text);
        assert!(!config.cleaning.deduplicate_on_cleaned_text);
        assert_eq!(config.output_format().unwrap(), DataFormat::Csv);
        assert_eq!(config.output.sample_size, 10);
    }

    #[test]
    fn test_explicit_format_wins() {
        let config = Config::from_toml("[output]\nformat = \"csv\"\nfilename = \"x.json\"\n").unwrap();
        assert_eq!(config.output_format().unwrap(), DataFormat::Csv);
    }

    #[test]
    fn test_rejects_empty_filename_and_bad_toml() {
        assert!(matches!(
            Config::from_toml("[output]\nfilename = \"\"\n"),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(Config::from_toml("[output\n"), Err(PipelineError::Toml(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.output, OutputConfig::default());
    }
}
