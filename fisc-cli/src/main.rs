use anyhow::Result;
use clap::Parser;
use tracing::debug;

use fisc_cli::cli::Cli;
use fisc_cli::commands::{build_service, execute};
use fisc_cli::config::{FiscConfig, Settings};
use fisc_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = FiscConfig::discover(cli.global.config.as_deref())?;
    let settings = Settings::resolve(&cli.global, config)?;
    logging::init(settings.log_file.as_deref())?;
    debug!(?settings, "settings resolved");

    let service = build_service(&settings);
    let output = execute(&cli.command, &settings, &service)?;
    println!("{output}");

    Ok(())
}
