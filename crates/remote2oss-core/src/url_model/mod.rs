//! URL modeling and path derivation.
//!
//! Turns an arbitrary download URL into a local cache filename and an
//! object-storage key, both restricted to `[0-9a-z._/-]`, and joins storage
//! keys onto the public URL prefix.

mod path;
mod sanitize;

pub use path::{decoded_path, local_basename, path_basename, storage_key};
pub use sanitize::sanitize_segment;

use crate::error::UrlError;
use std::path::{Path, PathBuf};
use url::Url;

/// One invocation's target: the URL and everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub url: Url,
    pub local_path: PathBuf,
    pub storage_key: String,
}

impl TransferRequest {
    /// Parses `location` and derives the cache path under `workspace` and the storage key.
    pub fn derive(location: &str, workspace: &Path) -> Result<Self, UrlError> {
        let url = parse_location(location)?;
        let local_path = workspace.join(local_basename(&url)?);
        let storage_key = storage_key(&url)?;
        Ok(TransferRequest {
            url,
            local_path,
            storage_key,
        })
    }
}

/// Parses a user-supplied location, accepting only http(s) URLs with a host.
pub fn parse_location(location: &str) -> Result<Url, UrlError> {
    let location = location.trim();
    let url = Url::parse(location).map_err(|source| UrlError::Parse {
        url: location.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(location.to_string()));
    }
    Ok(url)
}

/// Local cache path for `location` inside `workspace`.
pub fn local_path(workspace: &Path, location: &str) -> Result<PathBuf, UrlError> {
    let url = parse_location(location)?;
    Ok(workspace.join(local_basename(&url)?))
}

/// Joins the public URL prefix and a storage key with exactly one `/`.
///
/// # Examples
///
/// - `public_url("https://bucket.oss.example.com/", "/cdn.example.com/a.png")`
///   → `"https://bucket.oss.example.com/cdn.example.com/a.png"`
pub fn public_url(prefix: &str, key: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim().trim_end_matches('/'),
        key.trim().trim_start_matches('/')
    )
}
