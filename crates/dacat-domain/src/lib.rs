//! dacat Domain Layer
//!
//! Core vocabulary for classifying data availability statements. This crate has
//! no external dependencies and defines the concepts every other layer shares.
//!
//! ## Key Concepts
//!
//! - **Category**: one of the seven accessibility classes, ranked from most to
//!   least publicly accessible
//! - **Label**: what ends up in the `Category` output column, either a
//!   category or the `ERROR` sentinel
//! - **ClassificationResult**: label plus free-text reason, one per statement
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Model access is expressed as a trait ([`traits::LlmProvider`]); the
//!   transports live in `dacat-llm`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classification;
pub mod taxonomy;
pub mod traits;

// Re-exports for convenience
pub use classification::{ClassificationResult, Label};
pub use taxonomy::Category;

/// Name of the output column holding the label
pub const CATEGORY_COLUMN: &str = "Category";

/// Name of the output column holding the model's rationale
pub const REASON_COLUMN: &str = "Reason";

/// Label written when every classification attempt failed
pub const ERROR_LABEL: &str = "ERROR";
