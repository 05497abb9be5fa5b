//! Configuration for pipeline runs
//!
//! Locations, the text column and the worker count. One value is built at
//! startup and handed to the scheduler and merger.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a pipeline run
///
/// # Examples
///
/// ```
/// use dacat_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.text_column, "data");
/// assert_eq!(config.workers, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding one input file per statement
    pub input_dir: PathBuf,

    /// Directory receiving one classified file per input
    pub output_dir: PathBuf,

    /// Location of the merged dataset
    pub final_output: PathBuf,

    /// Column holding the statement text (matched after trimming headers)
    pub text_column: String,

    /// File extension identifying input and output units, without the dot
    pub extension: String,

    /// Number of units processed concurrently
    /// Default: 6 (eight cores minus two of headroom)
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let base = PathBuf::from("data_availability_project");
        Self {
            input_dir: base.join("data_availability_all_1_1a"),
            output_dir: base.join("classified_natcomm_2023_by_gemma"),
            final_output: base.join("classified_natcomm_2023_by_gemma_all.csv"),
            text_column: "data".to_string(),
            extension: "csv".to_string(),
            workers: 6,
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.workers == 0 {
            return Err(PipelineError::Config("workers must be greater than 0".to_string()));
        }
        if self.text_column.trim().is_empty() {
            return Err(PipelineError::Config("text_column must not be empty".to_string()));
        }
        if self.extension.trim().is_empty() {
            return Err(PipelineError::Config("extension must not be empty".to_string()));
        }
        if self.input_dir == self.output_dir {
            return Err(PipelineError::Config(
                "input_dir and output_dir must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
