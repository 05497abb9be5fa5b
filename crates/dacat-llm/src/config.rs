//! Backend selection

use crate::command::{DEFAULT_MODEL, DEFAULT_PROGRAM};
use crate::ollama::DEFAULT_ENDPOINT;
use crate::{LlmError, OllamaCommandProvider, OllamaProvider};
use dacat_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};

/// Transport used to reach the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One `ollama run` child process per prompt
    #[default]
    Command,

    /// Ollama HTTP API
    Http,
}

/// Model settings, usually the `[model]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Transport to use
    #[serde(default)]
    pub backend: Backend,

    /// Model identifier passed to Ollama
    #[serde(default = "default_model")]
    pub model: String,

    /// Executable for the command backend
    #[serde(default = "default_program")]
    pub program: String,

    /// Base URL for the HTTP backend
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: default_model(),
            program: default_program(),
            endpoint: default_endpoint(),
        }
    }
}

impl ProviderConfig {
    /// Construct the configured provider
    pub fn build(&self) -> Result<Provider, LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::ModelNotAvailable("empty model name".to_string()));
        }
        match self.backend {
            Backend::Command => Ok(Provider::Command(
                OllamaCommandProvider::new(&self.model).with_program(&self.program),
            )),
            Backend::Http => Ok(Provider::Http(OllamaProvider::new(&self.endpoint, &self.model)?)),
        }
    }
}

/// A provider chosen at runtime
#[derive(Debug, Clone)]
pub enum Provider {
    /// Local process transport
    Command(OllamaCommandProvider),

    /// HTTP transport
    Http(OllamaProvider),
}

impl Provider {
    /// Short description for log lines
    pub fn describe(&self) -> String {
        match self {
            Provider::Command(p) => format!("{} run {}", p.program(), p.model()),
            Provider::Http(p) => format!("{} ({})", p.endpoint(), p.model()),
        }
    }
}

impl LlmProviderTrait for Provider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            Provider::Command(p) => p.generate(prompt).await,
            Provider::Http(p) => p.generate(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.backend, Backend::Command);
        assert_eq!(config.model, "gemma:2b");
        assert_eq!(config.program, "ollama");
        assert_eq!(config.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ProviderConfig = toml::from_str(
            r#"
            backend = "http"
            model = "llama3"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.model, "llama3");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_build_selects_backend() {
        let provider = ProviderConfig::default().build().unwrap();
        assert!(matches!(provider, Provider::Command(_)));
        assert_eq!(provider.describe(), "ollama run gemma:2b");

        let config = ProviderConfig {
            backend: Backend::Http,
            ..Default::default()
        };
        assert!(matches!(config.build().unwrap(), Provider::Http(_)));
    }

    #[test]
    fn test_build_rejects_empty_model() {
        let config = ProviderConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.build().is_err());
    }
}
