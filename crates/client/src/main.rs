//! `docvault`: command-line entry point.

use anyhow::Result;
use clap::Parser;

use docvault_client::cli::{self, Cli};
use docvault_client::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;
    cli::run(cli).await
}
