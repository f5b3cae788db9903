//! Logging init: human-readable lines on stderr, filtered by `RUST_LOG`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,remote2oss=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize structured logging to stderr.
///
/// Stdout is left to the public URL so the tool can be used in pipelines.
/// Returns Err if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!("remote2oss {} logging initialized", env!("CARGO_PKG_VERSION"));
    Ok(())
}
