//! Run command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use dacat_classifier::Classifier;
use dacat_pipeline::{Merger, Scheduler};
use std::time::Instant;
use tracing::info;

/// Execute the run command: classify every pending unit, then merge.
pub async fn execute_run(config: &Config, formatter: &Formatter) -> Result<()> {
    let started = Instant::now();

    let provider = config.model.build()?;
    info!("Using model {}", provider.describe());
    let classifier = Classifier::new(provider, config.classifier.clone());
    let scheduler = Scheduler::new(config.pipeline.clone(), classifier);

    let plan = scheduler.plan()?;
    println!("{}", formatter.plan(&plan, config.pipeline.workers));

    let metrics = scheduler
        .dispatch(&plan, |report| println!("{}", formatter.unit_report(report)))
        .await;
    info!("{}", metrics.summary());

    let merger = Merger::from_config(&config.pipeline);
    let outcome = tokio::task::spawn_blocking(move || merger.merge()).await??;
    println!("{}", formatter.merge_outcome(&outcome));

    println!("{}", formatter.total_time(started.elapsed()));
    Ok(())
}
