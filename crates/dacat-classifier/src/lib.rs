//! dacat Classifier
//!
//! Turns one data availability statement into a [`ClassificationResult`]
//! using a text-generation model.
//!
//! # Architecture
//!
//! ```text
//! Statement → PromptBuilder → LlmProvider → parser → ClassificationResult
//!                                  ↑                        │
//!                                  └──── retry on failure ──┘
//! ```
//!
//! The model is expected to reply with a JSON object holding `category` and
//! `reason`. Small local models rarely manage that cleanly, so the parser digs
//! the first balanced object out of whatever text comes back, and the
//! classifier retries a bounded number of times before settling on the
//! `ERROR` label.
//!
//! # Example Usage
//!
//! ```
//! use dacat_classifier::{Classifier, ClassifierConfig};
//! use dacat_domain::Category;
//! use dacat_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let llm = MockProvider::new(
//!     r#"{"category": "Author Upon Request Only", "reason": "on request"}"#,
//! );
//! let classifier = Classifier::new(llm, ClassifierConfig::default());
//!
//! let result = classifier
//!     .classify("Data are available from the corresponding author upon reasonable request.")
//!     .await;
//!
//! assert_eq!(result.category(), Some(Category::AuthorRequestOnly));
//! assert_eq!(result.attempts, 1);
//! # }
//! ```
//!
//! [`ClassificationResult`]: dacat_domain::ClassificationResult

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
pub mod parser;
mod prompt;


pub use classifier::{AttemptOutcome, Classifier, DetailedClassification};
pub use config::ClassifierConfig;
pub use error::ClassifierError;
pub use parser::ClassificationResponse;
pub use prompt::PromptBuilder;
