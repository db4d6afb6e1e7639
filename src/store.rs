//! Body persistence used by `setBody`.
//!
//! The response context never writes records itself; replacing a body is
//! delegated to a [`BodyStore`]. [`FsBodyStore`] replaces the body file
//! atomically, keeping the record's compression.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use log::debug;
use tempfile::NamedTempFile;

use crate::ContextError;
use crate::record::{BodyCompression, ResponseRecord};

/// Persistence seam for replacing a response body.
pub trait BodyStore: Send + Sync {
    /// Replace the body belonging to `record` with `body`.
    ///
    /// Returns the number of content bytes stored (before any compression).
    ///
    /// # Errors
    ///
    /// Implementations report storage failures as [`ContextError`].
    fn write_body(&self, record: &ResponseRecord, body: &[u8]) -> Result<u64, ContextError>;
}

/// Writes bodies to the file named by the record's `body_path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBodyStore;

impl BodyStore for FsBodyStore {
    fn write_body(&self, record: &ResponseRecord, body: &[u8]) -> Result<u64, ContextError> {
        let path = record.body_path().ok_or(ContextError::MissingBodyPath)?;
        debug!(
            "writing {} body bytes to {} ({:?})",
            body.len(),
            path.display(),
            record.body_compression
        );
        replace_file(path, |out| {
            if BodyCompression::is_gzip(record.body_compression) {
                let mut enc = GzEncoder::new(out, Compression::default());
                enc.write_all(body)?;
                enc.finish().map(drop)
            } else {
                out.write_all(body)
            }
        })?;
        Ok(u64::try_from(body.len()).unwrap_or(u64::MAX))
    }
}

/// Replace `path` with the bytes `write` produces, or leave it untouched.
///
/// Content goes to a temporary sibling that is renamed over `path` only
/// after `write` and the flush succeed; on failure the sibling is removed.
fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write(&mut out)?;
        out.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
