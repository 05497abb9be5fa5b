//! Configuration management for the CLI.

use crate::cli::Overrides;
use crate::error::{CliError, Result};
use dacat_classifier::ClassifierConfig;
use dacat_llm::ProviderConfig;
use dacat_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, one table per component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locations and worker count
    pub pipeline: PipelineConfig,

    /// Retry policy
    pub classifier: ClassifierConfig,

    /// Model backend
    pub model: ProviderConfig,

    /// Console settings
    pub settings: Settings,
}

/// Console settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON lines
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".dacat").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::default_path() {
                Ok(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.input_dir {
            self.pipeline.input_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.pipeline.output_dir = dir.clone();
        }
        if let Some(path) = &overrides.final_output {
            self.pipeline.final_output = path.clone();
        }
        if let Some(column) = &overrides.column {
            self.pipeline.text_column = column.clone();
        }
        if let Some(workers) = overrides.workers {
            self.pipeline.workers = workers;
        }
        if let Some(model) = &overrides.model {
            self.model.model = model.clone();
        }
        if let Some(backend) = overrides.backend {
            self.model.backend = backend.into();
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.model.endpoint = endpoint.clone();
        }
        if let Some(retries) = overrides.retries {
            self.classifier.max_retries = retries;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.classifier.invocation_timeout_secs = secs;
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.classifier.validate()?;
        if self.model.model.trim().is_empty() {
            return Err(CliError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use dacat_llm::Backend;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.settings.color);
        assert_eq!(config.model.model, "gemma:2b");
        assert_eq!(config.pipeline.workers, 6);
        assert_eq!(config.classifier.max_retries, 3);
    }

    #[test]
    fn test_sections_are_optional() {
        let config = Config::from_toml(
            r#"
            [pipeline]
            input_dir = "statements"
            workers = 4

            [model]
            backend = "http"
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.input_dir, PathBuf::from("statements"));
        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.pipeline.text_column, "data");
        assert_eq!(config.model.backend, Backend::Http);
        assert_eq!(config.model.model, "gemma:2b");
        assert_eq!(config.classifier.retry_delay_ms, 500);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.pipeline, config.pipeline);
        assert_eq!(parsed.classifier, config.classifier);
        assert_eq!(parsed.model, config.model);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        config.apply(&Overrides {
            workers: Some(2),
            column: Some("statement".to_string()),
            backend: Some(crate::cli::BackendArg::Http),
            retries: Some(5),
            ..Default::default()
        });
        assert_eq!(config.pipeline.workers, 2);
        assert_eq!(config.pipeline.text_column, "statement");
        assert_eq!(config.model.backend, Backend::Http);
        assert_eq!(config.classifier.max_retries, 5);
        assert_eq!(config.pipeline.input_dir, PipelineConfig::default().input_dir);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.apply(&Overrides {
            workers: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.apply(&Overrides {
            retries: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[classifier]\nmax_retries = 2\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.classifier.max_retries, 2);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(
            Config::from_toml("[pipeline\nworkers = 1"),
            Err(CliError::Toml(_))
        ));
    }
}
