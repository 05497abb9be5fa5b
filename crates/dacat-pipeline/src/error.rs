//! Error types for pipeline operations

use arrow::error::ArrowError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing a tabular unit
#[derive(Error, Debug)]
pub enum TableError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding or encoding error
    #[error("CSV error: {0}")]
    Arrow(#[from] ArrowError),

    /// The file has a header but no data rows
    #[error("table has no rows")]
    Empty,

    /// The file has no header at all
    #[error("table has no columns")]
    NoColumns,

    /// A column holds something other than text
    #[error("column '{0}' is not a text column")]
    NotText(String),
}

/// Errors that can occur during pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configured input directory does not exist
    #[error("Input directory not found: {}", .0.display())]
    InputDirMissing(PathBuf),

    /// The input directory holds no files with the configured extension
    #[error("No .{extension} files found in {}", .dir.display())]
    NoInputUnits {
        /// Directory that was scanned
        dir: PathBuf,
        /// Extension that was looked for
        extension: String,
    },

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular data error
    #[error(transparent)]
    Table(#[from] TableError),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether this error is a configuration precondition that aborts the run
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            PipelineError::InputDirMissing(_)
                | PipelineError::NoInputUnits { .. }
                | PipelineError::Config(_)
        )
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(e: tokio::task::JoinError) -> Self {
        PipelineError::Worker(e.to_string())
    }
}
