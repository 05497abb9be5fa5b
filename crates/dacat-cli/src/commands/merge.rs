//! Merge command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use dacat_pipeline::Merger;

/// Execute the merge command.
pub async fn execute_merge(config: &Config, formatter: &Formatter) -> Result<()> {
    let merger = Merger::from_config(&config.pipeline);
    let outcome = tokio::task::spawn_blocking(move || merger.merge()).await??;
    println!("{}", formatter.merge_outcome(&outcome));
    Ok(())
}
