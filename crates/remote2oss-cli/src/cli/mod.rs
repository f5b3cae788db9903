//! CLI for remote2oss.

mod mirror;

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use remote2oss_core::config;
use std::ffi::OsString;
use std::path::PathBuf;

pub use mirror::run_mirror;

/// Fetch a URL into the local workspace cache and mirror it to an OSS bucket.
#[derive(Debug, Parser)]
#[command(name = "remote2oss")]
#[command(about = "Fetch a URL into a local cache and mirror it to an OSS/S3 bucket", long_about = None)]
pub struct Cli {
    /// Configuration file (JSON; TOML when the extension is .toml). Defaults to ~/.remote2oss.json.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// URL to download.
    #[arg(short = 'l', long = "location", value_name = "URL")]
    pub location: Option<String>,

    /// Delete the local cache file after a successful upload.
    #[arg(long)]
    pub remove_local: bool,
}

impl Cli {
    /// The target URL, trimmed. Missing or blank is an error.
    pub fn location(&self) -> Result<&str> {
        match self.location.as_deref().map(str::trim) {
            Some(l) if !l.is_empty() => Ok(l),
            _ => bail!("missing argument '-l/--location'"),
        }
    }

    /// Explicit `--config`, else the default location under the home directory.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::default_config_path().context("resolving default config path"),
        }
    }
}

pub fn run_from_args() -> Result<()> {
    let cli = parse_args(std::env::args_os())?;
    run(&cli)
}

/// Parses arguments. `--help`/`--version` print and exit 0; every other parse
/// error is returned so `main` reports it and exits 1 like any other failure.
pub fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => Err(anyhow::Error::new(err).context("invalid arguments")),
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let location = cli.location()?;
    let config_path = cli.config_path()?;
    tracing::info!("config: {}", config_path.display());

    let cfg = config::load(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    let public_url = run_mirror(&cfg, location, cli.remove_local)?;
    println!("{public_url}");
    Ok(())
}

#[cfg(test)]
mod tests;
