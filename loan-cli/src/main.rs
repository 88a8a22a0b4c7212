use anyhow::Context;
use clap::Parser;
use tracing::debug;

use loan_cli::cli::Cli;
use loan_cli::config::{FileConfig, Settings};
use loan_cli::{app, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, cli.overrides()).context("invalid settings")?;

    logging::init_logging(&settings.log_level)?;
    if let Some(path) = &settings.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?settings, "resolved settings");

    let report = app::run(&cli.command, &settings)?;
    println!("{}", report.trim_end());

    Ok(())
}
