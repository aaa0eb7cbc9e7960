//! promptplace CLI - apply an issue's change request to a hosted page
//!
//! Exit code 0 when the page was rewritten and committed, 1 on any failure,
//! including missing configuration.

use anyhow::{Context, Result};
use clap::Parser;
use promptplace_core::{Config, Pipeline};
use std::process::ExitCode;
use tracing::error;

mod cli;
mod logging;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let _cli = Cli::parse();

    if let Err(e) = logging::initialize_logging() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run().await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run() -> Result<i32> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let pipeline = Pipeline::from_config(&config).context("Failed to set up clients")?;
    Ok(pipeline.execute().await)
}
