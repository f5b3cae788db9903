//! Default command: fetch `-l <url>` and mirror it to the configured bucket.

use anyhow::{Context, Result};
use remote2oss_core::config::Remote2OssConfig;
use remote2oss_core::fetch::{CurlFetcher, FetchOptions};
use remote2oss_core::transfer::{self, TransferOptions};
use remote2oss_core::upload::OssUploader;

/// Wires the real collaborators and returns the public URL of the uploaded object.
pub fn run_mirror(cfg: &Remote2OssConfig, location: &str, remove_local: bool) -> Result<String> {
    let uploader = OssUploader::new(cfg).context("creating OSS client")?;
    tracing::info!("bucket: {}", uploader.bucket());

    let fetcher = CurlFetcher::new(FetchOptions::from_config(cfg));
    let report = transfer::mirror(
        location,
        cfg.workspace_dir(),
        &cfg.oss_public_url,
        &fetcher,
        &uploader,
        TransferOptions { remove_local },
    )?;
    Ok(report.public_url)
}
