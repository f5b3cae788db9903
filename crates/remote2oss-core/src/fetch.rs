//! HTTP GET of the source resource.
//!
//! Uses the curl crate (libcurl). The response body is streamed into the
//! caller's sink only when the final status is exactly 200; any other status
//! aborts the transfer and is reported as [`FetchError::Status`].

use crate::config::Remote2OssConfig;
use crate::error::FetchError;
use std::cell::Cell;
use std::io::{self, Write};
use std::str;
use std::time::Duration;

/// Fetches a URL into a byte sink. Returns the number of body bytes written.
pub trait Fetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// Timeouts applied to the GET.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound on the whole transfer.
    pub timeout: Duration,
    /// Abort when throughput stays below `low_speed_limit` bytes/s for this long.
    pub low_speed_time: Duration,
    pub low_speed_limit: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
            low_speed_time: Duration::from_secs(60),
            low_speed_limit: 1024,
        }
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &Remote2OssConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            ..Self::default()
        }
    }
}

/// Blocking libcurl fetcher. Follows up to 10 redirects.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(concat!("remote2oss/", env!("CARGO_PKG_VERSION")))?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.low_speed_limit(self.opts.low_speed_limit)?;
        easy.low_speed_time(self.opts.low_speed_time)?;
        easy.timeout(self.opts.timeout)?;

        // Status of the most recent response; redirects overwrite it.
        let status: Cell<Option<u32>> = Cell::new(None);
        let mut written: u64 = 0;
        let mut write_err: Option<io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(Some(code));
                }
                true
            })?;
            transfer.write_function(|data| {
                if status.get() != Some(200) {
                    return Ok(0); // abort transfer
                }
                match sink.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0)
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Write(e));
        }
        if let Some(code) = status.get() {
            if code != 200 {
                return Err(FetchError::Status(code));
            }
        }
        performed?;

        let code = easy.response_code()?;
        if code != 200 {
            return Err(FetchError::Status(code));
        }
        sink.flush().map_err(FetchError::Write)?;
        tracing::debug!("GET {} -> {} bytes", url, written);
        Ok(written)
    }
}

/// Parses `HTTP/1.1 200 OK` / `HTTP/2 404` status lines; `None` for header lines.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
