//! Status command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the status command.
pub fn execute_status(config: &Config, formatter: &Formatter) -> Result<()> {
    let plan = dacat_pipeline::plan(&config.pipeline)?;

    println!("{}", formatter.plan(&plan, config.pipeline.workers));
    println!("{}", formatter.pending(&plan));
    Ok(())
}
