//! Error types for the Classifier

use std::time::Duration;
use thiserror::Error;

/// Reasons a single classification attempt can fail
///
/// None of these escape [`Classifier::classify`](crate::Classifier::classify);
/// they drive the retry loop and show up in logs and attempt reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The provider did not answer within the deadline
    #[error("Model invocation timed out after {0:?}")]
    Timeout(Duration),

    /// No balanced `{...}` object in the model output
    #[error("No structured data found in model output")]
    NoStructuredData,

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Required field missing or not a string
    #[error("Missing or invalid field '{0}'")]
    MissingField(&'static str),

    /// The model named a category outside the taxonomy
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClassifierError {
    fn from(e: serde_json::Error) -> Self {
        ClassifierError::JsonParse(e.to_string())
    }
}
