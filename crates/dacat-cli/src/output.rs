//! Output formatting for the CLI.

use crate::config::OutputFormat;
use colored::*;
use dacat_classifier::{AttemptOutcome, DetailedClassification};
use dacat_domain::{Category, ERROR_LABEL};
use dacat_pipeline::{MergeOutcome, UnitReport, UnitStatus, WorkPlan};
use std::collections::BTreeMap;
use std::time::Duration;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Counts printed before dispatch.
    pub fn plan(&self, plan: &WorkPlan, workers: usize) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({
                "event": "plan",
                "total": plan.inputs,
                "already_processed": plan.already_processed,
                "remaining": plan.remaining(),
                "workers": workers,
            })
            .to_string(),
            OutputFormat::Text => format!(
                "Total files: {}\nAlready processed: {}\nRemaining: {}\nUsing {} workers",
                plan.inputs,
                plan.already_processed,
                plan.remaining(),
                workers
            ),
        }
    }

    /// Names of units still to classify.
    pub fn pending(&self, plan: &WorkPlan) -> String {
        let names: Vec<String> = plan.pending.iter().map(|p| dacat_pipeline::unit_name(p)).collect();
        match self.format {
            OutputFormat::Json => serde_json::json!({ "event": "pending", "units": names }).to_string(),
            OutputFormat::Text if names.is_empty() => self.success("Nothing left to classify"),
            OutputFormat::Text => names.join("\n"),
        }
    }

    /// One status line per finished unit.
    pub fn unit_report(&self, report: &UnitReport) -> String {
        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::json!({
                    "event": "unit",
                    "name": report.name,
                });
                match &report.status {
                    UnitStatus::Done { label } => {
                        value["status"] = "done".into();
                        value["label"] = label.as_str().into();
                    }
                    UnitStatus::ColumnMissing { column } => {
                        value["status"] = "column_missing".into();
                        value["column"] = column.as_str().into();
                    }
                    UnitStatus::Failed { message } => {
                        value["status"] = "error".into();
                        value["message"] = message.as_str().into();
                    }
                }
                value.to_string()
            }
            OutputFormat::Text => {
                let line = report.to_string();
                match &report.status {
                    UnitStatus::Done { label } if label.as_str() == ERROR_LABEL => {
                        self.colorize(&line, "yellow")
                    }
                    UnitStatus::Done { .. } => self.colorize(&line, "green"),
                    UnitStatus::ColumnMissing { .. } => self.colorize(&line, "yellow"),
                    UnitStatus::Failed { .. } => self.colorize(&line, "red"),
                }
            }
        }
    }

    /// Result of the merge step, with the category table when written.
    pub fn merge_outcome(&self, outcome: &MergeOutcome) -> String {
        match (self.format, outcome) {
            (OutputFormat::Json, MergeOutcome::Skipped) => {
                serde_json::json!({ "event": "merge", "written": false }).to_string()
            }
            (
                OutputFormat::Json,
                MergeOutcome::Written {
                    path,
                    files,
                    rows,
                    categories,
                },
            ) => serde_json::json!({
                "event": "merge",
                "written": true,
                "path": path.display().to_string(),
                "files": files,
                "rows": rows,
                "categories": categories,
            })
            .to_string(),
            (OutputFormat::Text, MergeOutcome::Skipped) => {
                self.warning("No classified files found.")
            }
            (
                OutputFormat::Text,
                MergeOutcome::Written {
                    path, categories, ..
                },
            ) => format!(
                "{}\n{}",
                self.success(&format!("Final merged file saved to: {}", path.display())),
                self.category_table(categories)
            ),
        }
    }

    /// Rows per category, taxonomy order first, then `ERROR`, then anything else.
    pub fn category_table(&self, counts: &BTreeMap<String, usize>) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Rank", "Category", "Rows"]);

        for category in Category::ALL {
            let count = counts.get(category.as_str()).copied().unwrap_or(0);
            builder.push_record([
                category.rank().to_string(),
                category.as_str().to_string(),
                count.to_string(),
            ]);
        }
        builder.push_record([
            "-".to_string(),
            ERROR_LABEL.to_string(),
            counts.get(ERROR_LABEL).copied().unwrap_or(0).to_string(),
        ]);
        for (value, count) in counts {
            if value != ERROR_LABEL && Category::parse(value).is_none() {
                builder.push_record(["?".to_string(), value.clone(), count.to_string()]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Alignment::right()));
        table.to_string()
    }

    /// Single-statement classification.
    pub fn classification(&self, detailed: &DetailedClassification, show_attempts: bool) -> String {
        let result = &detailed.result;
        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::json!({
                    "label": result.label.as_str(),
                    "reason": result.reason,
                    "attempts": result.attempts,
                });
                if show_attempts {
                    value["history"] = detailed.attempts.iter().map(attempt_json).collect();
                }
                value.to_string()
            }
            OutputFormat::Text => {
                let label = if result.is_error() {
                    self.colorize(result.label.as_str(), "red")
                } else {
                    self.colorize(result.label.as_str(), "green")
                };
                let mut out = format!(
                    "Category: {}\nReason: {}\nAttempts: {}",
                    label, result.reason, result.attempts
                );
                if show_attempts {
                    for (idx, attempt) in detailed.attempts.iter().enumerate() {
                        out.push_str(&format!("\n  #{} {}", idx + 1, attempt_text(attempt)));
                    }
                }
                out
            }
        }
    }

    /// Wall time of the whole command.
    pub fn total_time(&self, elapsed: Duration) -> String {
        let minutes = elapsed.as_secs_f64() / 60.0;
        match self.format {
            OutputFormat::Json => {
                serde_json::json!({ "event": "finished", "minutes": minutes }).to_string()
            }
            OutputFormat::Text => format!("Total time: {:.2} minutes", minutes),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn attempt_text(attempt: &AttemptOutcome) -> String {
    match attempt {
        AttemptOutcome::Succeeded { .. } => "ok".to_string(),
        AttemptOutcome::InvocationFailed(error) => format!("invocation failed: {}", error),
        AttemptOutcome::ExtractionFailed { raw, error } => {
            format!("unusable reply ({}): {}", error, raw)
        }
    }
}

fn attempt_json(attempt: &AttemptOutcome) -> serde_json::Value {
    match attempt {
        AttemptOutcome::Succeeded { raw } => serde_json::json!({ "outcome": "ok", "raw": raw }),
        AttemptOutcome::InvocationFailed(error) => {
            serde_json::json!({ "outcome": "invocation_failed", "error": error.to_string() })
        }
        AttemptOutcome::ExtractionFailed { raw, error } => serde_json::json!({
            "outcome": "extraction_failed",
            "error": error.to_string(),
            "raw": raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dacat_classifier::ClassifierError;
    use dacat_domain::{ClassificationResult, Label};
    use std::path::PathBuf;

    fn plain() -> Formatter {
        Formatter::new(OutputFormat::Text, false)
    }

    #[test]
    fn test_plan_lines() {
        let plan = WorkPlan {
            inputs: 10,
            already_processed: 4,
            pending: vec![PathBuf::from("in/a.csv")],
        };
        let output = plain().plan(&plan, 6);
        assert_eq!(
            output,
            "Total files: 10\nAlready processed: 4\nRemaining: 1\nUsing 6 workers"
        );
        assert_eq!(plain().pending(&plan), "a.csv");
    }

    #[test]
    fn test_unit_report_lines() {
        let report = UnitReport {
            name: "a.csv".to_string(),
            status: UnitStatus::Failed {
                message: "table has no rows".to_string(),
            },
        };
        assert_eq!(plain().unit_report(&report), "Error in a.csv: table has no rows");

        let json = Formatter::new(OutputFormat::Json, false).unit_report(&report);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["name"], "a.csv");
    }

    #[test]
    fn test_skipped_merge() {
        let output = plain().merge_outcome(&MergeOutcome::Skipped);
        assert!(output.contains("No classified files found."));
    }

    #[test]
    fn test_category_table_lists_taxonomy_in_order() {
        let counts = BTreeMap::from([
            ("Author Upon Request Only".to_string(), 2),
            ("ERROR".to_string(), 1),
            ("".to_string(), 1),
        ]);
        let output = plain().category_table(&counts);
        let first = output.find("Fully Public Repository Deposition").unwrap();
        let last = output.find("No Data Generated / Not Applicable").unwrap();
        let error = output.find("ERROR").unwrap();
        assert!(first < last && last < error);
        assert!(output.contains("Author Upon Request Only"));
        assert!(output.contains('?'));
    }

    #[test]
    fn test_classification_with_attempts() {
        let detailed = DetailedClassification {
            result: ClassificationResult::classified(Category::ControlledAccess, "dbGaP", 2),
            attempts: vec![
                AttemptOutcome::InvocationFailed(ClassifierError::Llm("refused".to_string())),
                AttemptOutcome::Succeeded {
                    raw: "{}".to_string(),
                },
            ],
        };
        let output = plain().classification(&detailed, true);
        assert!(output.starts_with("Category: Controlled-Access Repository Data"));
        assert!(output.contains("Attempts: 2"));
        assert!(output.contains("#1 invocation failed"));
        assert!(output.contains("#2 ok"));

        let json = Formatter::new(OutputFormat::Json, false).classification(&detailed, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["label"], Label::Category(Category::ControlledAccess).as_str());
        assert!(value.get("history").is_none());
    }

    #[test]
    fn test_total_time() {
        assert_eq!(
            plain().total_time(Duration::from_secs(150)),
            "Total time: 2.50 minutes"
        );
    }

    #[test]
    fn test_colorize_disabled() {
        assert_eq!(plain().success("test"), "✓ test");
    }
}
