//! Concatenates every classified unit into one dataset

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::scheduler::list_units;
use crate::table::Table;
use dacat_domain::CATEGORY_COLUMN;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merged file was written
    Written {
        /// Location of the merged file
        path: PathBuf,
        /// Output units merged
        files: usize,
        /// Data rows in the merged file
        rows: usize,
        /// Rows per `Category` value
        categories: BTreeMap<String, usize>,
    },

    /// No classified units exist; nothing was written
    Skipped,
}

/// Merges the output directory into the final dataset
#[derive(Debug, Clone)]
pub struct Merger {
    output_dir: PathBuf,
    final_output: PathBuf,
    extension: String,
}

impl Merger {
    /// Create a merger
    pub fn new(
        output_dir: impl Into<PathBuf>,
        final_output: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            final_output: final_output.into(),
            extension: extension.into(),
        }
    }

    /// Create a merger for the locations in `config`
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.output_dir.clone(),
            config.final_output.clone(),
            config.extension.clone(),
        )
    }

    /// Output units that would be merged, in name order
    pub fn sources(&self) -> Result<Vec<PathBuf>, PipelineError> {
        if !self.output_dir.is_dir() {
            return Ok(Vec::new());
        }
        Ok(list_units(&self.output_dir, &self.extension)?
            .into_iter()
            .filter(|p| !same_path(p, &self.final_output))
            .collect())
    }

    /// Union every output unit into the final file, replacing it atomically
    pub fn merge(&self) -> Result<MergeOutcome, PipelineError> {
        let sources = self.sources()?;
        if sources.is_empty() {
            info!("No classified files found in {}", self.output_dir.display());
            return Ok(MergeOutcome::Skipped);
        }

        let tables = sources
            .iter()
            .map(|p| Table::read_csv(p))
            .collect::<Result<Vec<_>, _>>()?;
        let merged = Table::union(&tables)?;

        if let Some(parent) = self.final_output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        merged.write_csv_atomic(&self.final_output)?;

        let categories = match merged.column_index(CATEGORY_COLUMN) {
            Some(column) => merged.value_counts(column)?,
            None => BTreeMap::new(),
        };

        info!(
            "Merged {} files ({} rows) into {}",
            sources.len(),
            merged.num_rows(),
            self.final_output.display()
        );
        Ok(MergeOutcome::Written {
            path: self.final_output.clone(),
            files: sources.len(),
            rows: merged.num_rows(),
            categories,
        })
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_output_dir_is_skipped() {
        let dir = TempDir::new().unwrap();
        let merger = Merger::new(dir.path().join("out"), dir.path().join("all.csv"), "csv");
        assert_eq!(merger.merge().unwrap(), MergeOutcome::Skipped);
        assert!(!dir.path().join("all.csv").exists());
    }

    #[test]
    fn test_merge_concatenates_in_name_order() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("b.csv"), "data,Category\nsecond,ERROR\n").unwrap();
        fs::write(out.join("a.csv"), "data,Category\nfirst,ERROR\n").unwrap();

        let final_output = dir.path().join("nested").join("all.csv");
        let merger = Merger::new(&out, &final_output, "csv");
        let outcome = merger.merge().unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Written {
                path: final_output.clone(),
                files: 2,
                rows: 2,
                categories: BTreeMap::from([("ERROR".to_string(), 2)]),
            }
        );

        let merged = Table::read_csv(&final_output).unwrap();
        assert_eq!(merged.first_text(0).unwrap(), "first");
        assert_eq!(merged.text(0, 1).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_final_output_inside_output_dir_is_excluded() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("a.csv"), "data\nx\n").unwrap();
        let final_output = out.join("all.csv");

        let merger = Merger::new(&out, &final_output, "csv");
        merger.merge().unwrap();
        let outcome = merger.merge().unwrap();
        assert!(matches!(outcome, MergeOutcome::Written { files: 1, rows: 1, .. }));
    }
}
