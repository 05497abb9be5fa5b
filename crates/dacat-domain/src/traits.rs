//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::fmt::Display;
use std::future::Future;

/// Trait for text-generation backends
///
/// Implemented by the infrastructure layer (dacat-llm). A provider is shared
/// by every worker of a run, so implementations must be `Send + Sync` and
/// tolerate concurrent calls.
pub trait LlmProvider: Send + Sync {
    /// Error type for generation failures
    type Error: Display + Send;

    /// Send a prompt and return the model's raw reply
    ///
    /// The reply is returned verbatim apart from surrounding whitespace. It is
    /// not validated in any way.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
