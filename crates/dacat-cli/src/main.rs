//! dacat - classify data availability statements with a local model.

use clap::Parser;
use dacat_cli::commands;
use dacat_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only the progress stream
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> dacat_cli::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(&cli.overrides);
    config.validate()?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => commands::execute_run(&config, &formatter).await,
        Command::Status => commands::execute_status(&config, &formatter),
        Command::Merge => commands::execute_merge(&config, &formatter).await,
        Command::Classify(args) => {
            commands::execute_classify(args, cli.verbose > 0, &config, &formatter).await
        }
        Command::Config => commands::execute_config(&config),
    }
}
