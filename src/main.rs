use std::{process::ExitCode, sync::Arc};

use anyhow::Result;
use casafari_sync::{cli, config, logger::setup_logger};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    // Initialize logger
    setup_logger()?;

    let config = Arc::new(config::read_config()?);

    cli::run(cli, config).await
}
