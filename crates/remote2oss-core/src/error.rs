//! Error taxonomy for a single fetch-and-mirror run.
//!
//! Every variant is terminal: nothing here is retried, the CLI logs it and
//! exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be located, read, parsed or validated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine home directory ($HOME is unset)")]
    NoHome,
    #[error("xdg: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse TOML config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Target URL is unusable for deriving a cache path or storage key.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL {url:?}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("URL has no host: {0}")]
    MissingHost(String),
    #[error("URL path has no file name: {0}")]
    EmptyBasename(String),
    #[error("URL path contains a parent-directory segment: {0}")]
    Traversal(String),
}

/// HTTP fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("bad code: {0}")]
    Status(u32),
    #[error("write to local file failed: {0}")]
    Write(#[source] std::io::Error),
}

/// Object-storage upload failed.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to start upload runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to open {} for upload: {message}", .path.display())]
    Body { path: PathBuf, message: String },
    #[error("put object {key:?} into bucket {bucket:?}: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Any failure of the transfer orchestration.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Url(#[from] UrlError),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache path exists but is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),
}

impl TransferError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
