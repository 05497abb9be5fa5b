//! Per-unit processing: read, classify, persist

use crate::error::PipelineError;
use crate::table::Table;
use dacat_classifier::Classifier;
use dacat_domain::traits::LlmProvider;
use dacat_domain::Label;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Terminal status of one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitStatus {
    /// Output written with this label
    Done {
        /// Label assigned to every row of the unit
        label: Label,
    },

    /// The text column is absent; nothing was written
    ColumnMissing {
        /// Column that was looked for
        column: String,
    },

    /// Reading, classifying or writing failed; nothing was written
    Failed {
        /// Error description
        message: String,
    },
}

/// Status line for one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    /// File name of the unit
    pub name: String,

    /// What happened to it
    pub status: UnitStatus,
}

impl UnitReport {
    /// Whether an output file now exists for this unit
    pub fn is_done(&self) -> bool {
        matches!(self.status, UnitStatus::Done { .. })
    }
}

impl fmt::Display for UnitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            UnitStatus::Done { label } => write!(f, "Done: {} [{}]", self.name, label),
            UnitStatus::ColumnMissing { .. } => write!(f, "Column missing: {}", self.name),
            UnitStatus::Failed { message } => write!(f, "Error in {}: {}", self.name, message),
        }
    }
}

/// File name used to pair an input unit with its output
pub fn unit_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Turns one input file into one classified output file
pub struct RecordProcessor<L>
where
    L: LlmProvider,
{
    classifier: Arc<Classifier<L>>,
    output_dir: PathBuf,
    text_column: String,
}

impl<L> RecordProcessor<L>
where
    L: LlmProvider + 'static,
{
    /// Create a processor writing into `output_dir`
    pub fn new(
        classifier: Arc<Classifier<L>>,
        output_dir: impl Into<PathBuf>,
        text_column: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            output_dir: output_dir.into(),
            text_column: text_column.into(),
        }
    }

    /// Where the output for `input` goes
    pub fn output_path(&self, input: &Path) -> PathBuf {
        self.output_dir.join(unit_name(input))
    }

    /// Process one unit; never fails, every outcome is a report
    pub async fn process(&self, input: &Path) -> UnitReport {
        let name = unit_name(input);
        let status = match self.try_process(input).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Error in {}: {}", name, e);
                UnitStatus::Failed {
                    message: e.to_string(),
                }
            }
        };
        UnitReport { name, status }
    }

    async fn try_process(&self, input: &Path) -> Result<UnitStatus, PipelineError> {
        let path = input.to_path_buf();
        let table = tokio::task::spawn_blocking(move || Table::read_csv(&path)).await??;

        let Some(column) = table.column_index(&self.text_column) else {
            warn!(
                "Column '{}' missing in {}",
                self.text_column,
                input.display()
            );
            return Ok(UnitStatus::ColumnMissing {
                column: self.text_column.clone(),
            });
        };

        let text = table.first_text(column)?;
        if table.num_rows() > 1 {
            debug!(
                "{} has {} rows; classifying the first and applying its label to all",
                input.display(),
                table.num_rows()
            );
        }

        let result = self.classifier.classify(&text).await;
        let classified = table.with_classification(&result)?;

        let output = self.output_path(input);
        tokio::task::spawn_blocking(move || classified.write_csv_atomic(&output)).await??;

        info!("Classified {} as {}", input.display(), result.label);
        Ok(UnitStatus::Done {
            label: result.label,
        })
    }
}
