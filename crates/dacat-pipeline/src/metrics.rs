//! Run metrics for reporting

use crate::processor::{UnitReport, UnitStatus};
use dacat_domain::Label;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters collected while dispatching units
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Units handed to workers
    pub dispatched: usize,

    /// Units whose output was written
    pub done: usize,

    /// Units skipped because the text column was absent
    pub column_missing: usize,

    /// Units that failed
    pub failed: usize,

    /// Written units per label, in taxonomy order with `ERROR` last
    pub labels: BTreeMap<Label, usize>,

    /// Wall time of the dispatch phase
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Create empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished unit
    pub fn record(&mut self, report: &UnitReport) {
        self.dispatched += 1;
        match &report.status {
            UnitStatus::Done { label } => {
                self.done += 1;
                *self.labels.entry(*label).or_insert(0) += 1;
            }
            UnitStatus::ColumnMissing { .. } => self.column_missing += 1,
            UnitStatus::Failed { .. } => self.failed += 1,
        }
    }

    /// Units written with the `ERROR` label
    pub fn error_labels(&self) -> usize {
        self.labels.get(&Label::Error).copied().unwrap_or(0)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "Dispatched: {}, Done: {} ({} labelled ERROR), Column missing: {}, Failed: {}, Time: {:.2} minutes",
            self.dispatched,
            self.done,
            self.error_labels(),
            self.column_missing,
            self.failed,
            self.elapsed.as_secs_f64() / 60.0
        )
    }
}
