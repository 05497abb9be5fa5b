//! Discovers pending units and runs them on a bounded pool of workers

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::metrics::RunMetrics;
use crate::processor::{unit_name, RecordProcessor, UnitReport, UnitStatus};
use dacat_classifier::Classifier;
use dacat_domain::traits::LlmProvider;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// What a run will do, computed before any unit is dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPlan {
    /// Input units found
    pub inputs: usize,

    /// Input units that already have an output
    pub already_processed: usize,

    /// Input units still to classify, sorted by name
    pub pending: Vec<PathBuf>,
}

impl WorkPlan {
    /// Units that will be dispatched
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// List regular files in `dir` with the given extension, sorted by name
pub fn list_units(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut units = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            units.push(path);
        }
    }
    units.sort();
    Ok(units)
}

/// Scan input and output directories and work out what is left
///
/// Creates the output directory if needed. Fails when the input directory
/// is missing or holds no units.
pub fn plan(config: &PipelineConfig) -> Result<WorkPlan, PipelineError> {
    let input_dir = &config.input_dir;
    if !input_dir.is_dir() {
        return Err(PipelineError::InputDirMissing(input_dir.clone()));
    }

    let inputs = list_units(input_dir, &config.extension)?;
    if inputs.is_empty() {
        return Err(PipelineError::NoInputUnits {
            dir: input_dir.clone(),
            extension: config.extension.clone(),
        });
    }

    fs::create_dir_all(&config.output_dir)?;
    let processed: HashSet<String> = list_units(&config.output_dir, &config.extension)?
        .iter()
        .map(|p| unit_name(p))
        .collect();

    let total = inputs.len();
    let pending: Vec<PathBuf> = inputs
        .into_iter()
        .filter(|p| !processed.contains(&unit_name(p)))
        .collect();

    let plan = WorkPlan {
        inputs: total,
        already_processed: total - pending.len(),
        pending,
    };
    debug!("Planned run: {:?}", plan);
    Ok(plan)
}

/// Runs every pending unit through a [`RecordProcessor`]
pub struct Scheduler<L>
where
    L: LlmProvider,
{
    config: PipelineConfig,
    processor: Arc<RecordProcessor<L>>,
}

impl<L> Scheduler<L>
where
    L: LlmProvider + 'static,
{
    /// Create a scheduler sharing one classifier across all workers
    pub fn new(config: PipelineConfig, classifier: Classifier<L>) -> Self {
        let processor = RecordProcessor::new(
            Arc::new(classifier),
            config.output_dir.clone(),
            config.text_column.clone(),
        );
        Self {
            config,
            processor: Arc::new(processor),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Scan input and output directories and work out what is left
    pub fn plan(&self) -> Result<WorkPlan, PipelineError> {
        plan(&self.config)
    }

    /// Process every pending unit with at most `workers` in flight
    ///
    /// `on_report` is called once per unit as it finishes, in completion
    /// order. A unit whose worker dies is reported as failed.
    pub async fn dispatch<F>(&self, plan: &WorkPlan, mut on_report: F) -> RunMetrics
    where
        F: FnMut(&UnitReport),
    {
        let started = Instant::now();
        let workers = self.config.workers.max(1);
        let mut metrics = RunMetrics::new();
        let mut queue = plan.pending.iter().cloned();
        let mut in_flight = JoinSet::new();
        let mut names = HashMap::new();

        info!(
            "Dispatching {} units with {} workers",
            plan.remaining(),
            workers
        );

        loop {
            while in_flight.len() < workers {
                let Some(path) = queue.next() else { break };
                let processor = Arc::clone(&self.processor);
                let name = unit_name(&path);
                let handle = in_flight.spawn(async move { processor.process(&path).await });
                names.insert(handle.id(), name);
            }

            let Some(joined) = in_flight.join_next_with_id().await else {
                break;
            };

            let report = match joined {
                Ok((id, report)) => {
                    names.remove(&id);
                    report
                }
                Err(e) => {
                    let name = names.remove(&e.id()).unwrap_or_default();
                    error!("Worker for {} died: {}", name, e);
                    UnitReport {
                        name,
                        status: UnitStatus::Failed {
                            message: format!("worker died: {}", e),
                        },
                    }
                }
            };

            metrics.record(&report);
            on_report(&report);
        }

        metrics.elapsed = started.elapsed();
        info!("{}", metrics.summary());
        metrics
    }

    /// Plan and dispatch in one call
    pub async fn run<F>(&self, on_report: F) -> Result<(WorkPlan, RunMetrics), PipelineError>
    where
        F: FnMut(&UnitReport),
    {
        let plan = self.plan()?;
        let metrics = self.dispatch(&plan, on_report).await;
        Ok((plan, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dacat_classifier::ClassifierConfig;
    use dacat_llm::MockProvider;
    use tempfile::TempDir;

    fn scheduler(dir: &TempDir, workers: usize) -> Scheduler<MockProvider> {
        let config = PipelineConfig {
            input_dir: dir.path().join("in"),
            output_dir: dir.path().join("out"),
            final_output: dir.path().join("all.csv"),
            workers,
            ..Default::default()
        };
        let llm = MockProvider::new(r#"{"category": "Author Upon Request Only", "reason": "r"}"#);
        let classifier = Classifier::new(
            llm,
            ClassifierConfig {
                retry_delay_ms: 0,
                ..Default::default()
            },
        );
        Scheduler::new(config, classifier)
    }

    #[test]
    fn test_list_units_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.csv", "a.csv", "notes.txt", ".hidden.partial"] {
            fs::write(dir.path().join(name), "data\nx\n").unwrap();
        }
        fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let units = list_units(dir.path(), "csv").unwrap();
        let names: Vec<_> = units.iter().map(|p| unit_name(p)).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_missing_input_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = scheduler(&dir, 2).plan().unwrap_err();
        assert!(matches!(err, PipelineError::InputDirMissing(_)));
        assert!(err.is_fatal_config());
    }

    #[test]
    fn test_empty_input_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("in")).unwrap();
        fs::write(dir.path().join("in").join("readme.txt"), "x").unwrap();

        let err = scheduler(&dir, 2).plan().unwrap_err();
        assert!(matches!(err, PipelineError::NoInputUnits { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_plan_skips_units_with_outputs() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        for name in ["a.csv", "b.csv", "c.csv"] {
            fs::write(input.join(name), "data\nx\n").unwrap();
        }
        fs::write(output.join("b.csv"), "data,Category,Reason\nx,ERROR,y\n").unwrap();
        fs::write(output.join("stale.csv"), "data\nx\n").unwrap();

        let plan = scheduler(&dir, 2).plan().unwrap();
        assert_eq!(plan.inputs, 3);
        assert_eq!(plan.already_processed, 1);
        assert_eq!(plan.remaining(), 2);
        assert!(plan.pending.iter().all(|p| unit_name(p) != "b.csv"));
    }

    #[tokio::test]
    async fn test_dispatch_reports_every_unit_once() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        for idx in 0..7 {
            fs::write(input.join(format!("{}.csv", idx)), format!("data\nstmt-{}\n", idx)).unwrap();
        }

        let scheduler = scheduler(&dir, 3);
        let plan = scheduler.plan().unwrap();
        let mut seen = Vec::new();
        let metrics = scheduler
            .dispatch(&plan, |report| seen.push(report.name.clone()))
            .await;

        seen.sort();
        assert_eq!(seen.len(), 7);
        seen.dedup();
        assert_eq!(seen.len(), 7);
        assert_eq!(metrics.done, 7);
        assert_eq!(list_units(&dir.path().join("out"), "csv").unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_dispatch_with_nothing_pending() {
        let dir = TempDir::new().unwrap();
        let scheduler = scheduler(&dir, 2);
        let plan = WorkPlan {
            inputs: 1,
            already_processed: 1,
            pending: Vec::new(),
        };

        let mut calls = 0;
        let metrics = scheduler.dispatch(&plan, |_| calls += 1).await;
        assert_eq!(calls, 0);
        assert_eq!(metrics.dispatched, 0);
    }
}
