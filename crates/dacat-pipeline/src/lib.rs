//! Resumable batch pipeline over directories of tabular units
//!
//! Each input file holds one data availability statement. The pipeline
//! classifies it, writes a copy with `Category` and `Reason` columns to the
//! output directory and finally merges all outputs into one dataset.
//!
//! # Flow
//!
//! ```text
//! input_dir/*.csv ──► Scheduler::plan ──► pending units
//!                                           │
//!                         JoinSet (≤ workers in flight)
//!                                           │
//!                         RecordProcessor::process ──► output_dir/<name>.csv
//!                                           │
//!                                   UnitReport stream
//!
//! output_dir/*.csv ──► Merger::merge ──► final_output
//! ```
//!
//! A unit counts as processed once its output file exists. Outputs are
//! written through a temp file and a rename, so an interrupted run leaves no
//! partial outputs and a rerun picks up exactly the remaining units.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod merger;
mod metrics;
mod processor;
mod scheduler;
pub mod table;

pub use config::PipelineConfig;
pub use error::{PipelineError, TableError};
pub use merger::{MergeOutcome, Merger};
pub use metrics::RunMetrics;
pub use processor::{unit_name, RecordProcessor, UnitReport, UnitStatus};
pub use scheduler::{list_units, plan, Scheduler, WorkPlan};
