//! Logging for the `docvault` command line.
//!
//! Logs go to stderr so stdout carries only command output (an envelope or a
//! recovered document). `RUST_LOG` overrides the `--log-level` flag.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise docvault tracing subscriber: {e}"))
}
