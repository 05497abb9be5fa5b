//! Configuration for the Classifier

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum model invocations per statement
    pub max_retries: u32,

    /// Pause between failed attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Deadline for a single model invocation (seconds)
    pub invocation_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 500,
            invocation_timeout_secs: 120,
        }
    }
}

impl ClassifierConfig {
    /// Pause between failed attempts as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Invocation deadline as a Duration
    pub fn invocation_timeout(&self) -> Duration {
        Duration::from_secs(self.invocation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.max_retries == 0 {
            return Err(ClassifierError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }
        if self.invocation_timeout_secs == 0 {
            return Err(ClassifierError::Config(
                "invocation_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ClassifierError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ClassifierError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ClassifierError> {
        toml::to_string_pretty(self)
            .map_err(|e| ClassifierError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let config = ClassifierConfig {
            max_retries: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ClassifierError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClassifierConfig {
            invocation_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = ClassifierConfig::from_toml("max_retries = 5").unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_ms, 500);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(ClassifierConfig::from_toml("max_retries = 0").is_err());
        assert!(ClassifierConfig::from_toml("max_retries = \"many\"").is_err());
    }

    #[test]
    fn test_to_toml_mentions_fields() {
        let toml_str = ClassifierConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("max_retries = 3"));
        assert!(toml_str.contains("invocation_timeout_secs = 120"));
    }
}
