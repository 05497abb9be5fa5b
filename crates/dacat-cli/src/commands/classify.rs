//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use dacat_classifier::Classifier;

/// Execute the classify command.
pub async fn execute_classify(
    args: ClassifyArgs,
    show_attempts: bool,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    if args.text.trim().is_empty() {
        return Err(CliError::InvalidInput("Statement text is empty".to_string()));
    }

    let classifier = Classifier::new(config.model.build()?, config.classifier.clone());
    let detailed = classifier.classify_detailed(&args.text).await;
    println!("{}", formatter.classification(&detailed, show_attempts));
    Ok(())
}
