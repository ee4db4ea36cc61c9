mod cli;
mod commands;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::debug;

use orgpulse_core::config::{load_dotenv, Config};

use crate::cli::CliArgs;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let config = Config::from_env();
    config.log_summary();
    debug!(command = ?args.command, "running");

    let output = commands::run(&args, config, Utc::now())?;
    let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
