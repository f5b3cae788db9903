//! Fetch-and-mirror orchestration.
//!
//! existence check → conditional download → upload → report. Every step is
//! fatal on error; nothing is retried and no partial success is reported.

use crate::cache::{self, CacheEntry, PartialFile};
use crate::error::TransferError;
use crate::fetch::Fetcher;
use crate::upload::Uploader;
use crate::url_model::{self, TransferRequest};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct TransferOptions {
    /// Delete the local cache file once the upload succeeded.
    pub remove_local: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub local_path: PathBuf,
    pub storage_key: String,
    pub public_url: String,
    /// True when an existing cache file was uploaded without fetching.
    pub cached: bool,
    /// Body bytes fetched in this run (0 on a cache hit).
    pub bytes_downloaded: u64,
}

/// Runs one transfer for an already-derived request.
pub fn run_transfer(
    request: &TransferRequest,
    public_url_prefix: &str,
    fetcher: &dyn Fetcher,
    uploader: &dyn Uploader,
    opts: TransferOptions,
) -> Result<TransferReport, TransferError> {
    let local_path = &request.local_path;
    tracing::info!("local file: {}", local_path.display());

    let (cached, bytes_downloaded) =
        match cache::lookup(local_path).map_err(TransferError::io(local_path))? {
            CacheEntry::File { len } => {
                tracing::info!("cache hit ({} bytes), skipping download", len);
                (true, 0)
            }
            CacheEntry::Missing => {
                let n = download(request, fetcher)?;
                tracing::info!("downloaded {} bytes", n);
                (false, n)
            }
            CacheEntry::Other => return Err(TransferError::NotAFile(local_path.clone())),
        };

    let public_url = url_model::public_url(public_url_prefix, &request.storage_key);
    tracing::info!("remote file: {}", public_url);
    uploader.upload(&request.storage_key, local_path)?;

    if opts.remove_local {
        fs::remove_file(local_path).map_err(TransferError::io(local_path))?;
        tracing::debug!("removed local file {}", local_path.display());
    }
    tracing::info!("done");

    Ok(TransferReport {
        local_path: local_path.clone(),
        storage_key: request.storage_key.clone(),
        public_url,
        cached,
        bytes_downloaded,
    })
}

/// Derives the request from `location` and runs it against `workspace`.
pub fn mirror(
    location: &str,
    workspace: &Path,
    public_url_prefix: &str,
    fetcher: &dyn Fetcher,
    uploader: &dyn Uploader,
    opts: TransferOptions,
) -> Result<TransferReport, TransferError> {
    tracing::info!("url: {}", location.trim());
    let request = TransferRequest::derive(location, workspace)?;
    run_transfer(&request, public_url_prefix, fetcher, uploader, opts)
}

/// Streams the URL into `<local>.part`, then renames it into place.
/// The temp file is removed on every failure path by `PartialFile`'s drop.
fn download(request: &TransferRequest, fetcher: &dyn Fetcher) -> Result<u64, TransferError> {
    let local_path = &request.local_path;
    if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(TransferError::io(parent))?;
    }

    let mut partial = PartialFile::create(local_path).map_err(TransferError::io(local_path))?;
    let written = fetcher.fetch(request.url.as_str(), &mut partial)?;
    partial
        .finalize(local_path)
        .map_err(TransferError::io(local_path))?;
    Ok(written)
}
