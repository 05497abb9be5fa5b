//! dacat LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `dacat-domain`.
//!
//! # Providers
//!
//! - `OllamaCommandProvider`: runs `ollama run <model>` as a child process,
//!   prompt on stdin, reply on stdout
//! - `OllamaProvider`: the same model through Ollama's HTTP API
//! - `MockProvider`: deterministic scripted replies for testing
//!
//! `ProviderConfig::build` selects one of the real transports at runtime and
//! wraps it in [`Provider`].
//!
//! # Examples
//!
//! ```
//! use dacat_llm::MockProvider;
//! use dacat_domain::traits::LlmProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod mock;
pub mod ollama;

use thiserror::Error;

pub use command::OllamaCommandProvider;
pub use config::{Backend, Provider, ProviderConfig};
pub use mock::{MockProvider, MockReply};
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The model process could not be started
    #[error("Failed to start model process: {0}")]
    Spawn(String),

    /// The model process exited unsuccessfully
    #[error("Model process exited with {status}: {stderr}")]
    ProcessFailed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}
