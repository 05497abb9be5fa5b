//! CLI command definitions and argument parsing.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// dacat - Classify data availability statements with a local model.
#[derive(Debug, Parser)]
#[command(name = "dacat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DACAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Values that take precedence over the configuration file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Directory of input units
    #[arg(long, global = true)]
    pub input_dir: Option<PathBuf>,

    /// Directory for classified units
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Merged output file
    #[arg(long, global = true)]
    pub final_output: Option<PathBuf>,

    /// Column holding the statement text
    #[arg(long, global = true)]
    pub column: Option<String>,

    /// Units processed concurrently
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Model identifier
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Model transport
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// Base URL for the HTTP backend
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model invocations per statement
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Deadline for one model invocation, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// One JSON document per line
    Json,
}

/// Model transport options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BackendArg {
    /// `ollama run` child process
    Command,
    /// Ollama HTTP API
    Http,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every pending unit, then merge (default)
    Run,

    /// Show how many units are done and which remain
    Status,

    /// Merge classified units into the final file
    Merge,

    /// Classify a single statement
    Classify(ClassifyArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Statement text
    pub text: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<BackendArg> for dacat_llm::Backend {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Command => dacat_llm::Backend::Command,
            BackendArg::Http => dacat_llm::Backend::Http,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::parse_from(["dacat"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_classify_command() {
        let cli = Cli::parse_from(["dacat", "classify", "Data are on Zenodo.", "-vv"]);
        match cli.command {
            Some(Command::Classify(args)) => assert_eq!(args.text, "Data are on Zenodo."),
            _ => panic!("Expected Classify command"),
        }
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_overrides_after_subcommand() {
        let cli = Cli::parse_from([
            "dacat",
            "run",
            "--workers",
            "2",
            "--backend",
            "http",
            "--column",
            "statement",
        ]);
        assert_eq!(cli.overrides.workers, Some(2));
        assert!(matches!(cli.overrides.backend, Some(BackendArg::Http)));
        assert_eq!(cli.overrides.column.as_deref(), Some("statement"));
    }

    #[test]
    fn test_backend_conversion() {
        let backend: dacat_llm::Backend = BackendArg::Http.into();
        assert_eq!(backend, dacat_llm::Backend::Http);
    }
}
