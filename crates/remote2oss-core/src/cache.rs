//! Local cache file lifecycle.
//!
//! Downloads land in `<name>.part` and are renamed to the final name only after
//! the body is fully written and synced. The temp file is removed on drop
//! unless finalized, so every early return or panic cleans up.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// What currently sits at a cache path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEntry {
    Missing,
    File { len: u64 },
    /// A directory or other non-regular file; never treated as a cache hit.
    Other,
}

/// Inspect `path`. Presence alone is a hit; there is no staleness or checksum test.
pub fn lookup(path: &Path) -> io::Result<CacheEntry> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(CacheEntry::File { len: meta.len() }),
        Ok(_) => Ok(CacheEntry::Other),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CacheEntry::Missing),
        Err(e) => Err(e),
    }
}

/// A download in progress. Removed from disk on drop unless [`PartialFile::finalize`] succeeded.
pub struct PartialFile {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    armed: bool,
}

impl PartialFile {
    /// Create (truncating) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let mut options = File::options();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o640);
        }
        let file = options.open(&temp_path)?;
        Ok(PartialFile {
            writer: Some(BufWriter::new(file)),
            temp_path,
            armed: true,
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and atomically rename to `final_path`. Fails if `final_path`
    /// is on a different filesystem than the temp file.
    pub fn finalize(mut self, final_path: &Path) -> io::Result<()> {
        let writer = self.writer.take().ok_or_else(closed)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, final_path)?;
        self.armed = false;
        Ok(())
    }
}

impl Write for PartialFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.as_mut().ok_or_else(closed)?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.as_mut().ok_or_else(closed)?.flush()
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Close before unlinking.
        drop(self.writer.take());
        match fs::remove_file(&self.temp_path) {
            Ok(()) => tracing::debug!("removed partial file {}", self.temp_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "failed to remove partial file {}: {}",
                self.temp_path.display(),
                e
            ),
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "partial file already finalized")
}
