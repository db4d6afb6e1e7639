//! Reading stored response bodies.
//!
//! Bodies live in their own file next to the record, optionally gzip
//! encoded. [`open_body`] yields a lazy reader that decodes on the fly;
//! [`read_body`] drains one into memory.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::record::BodyCompression;

/// Single-pass reader over a response body.
///
/// The underlying file is opened when the stream is created and closed when
/// it is dropped, whether or not it was read to the end.
pub struct BodyStream {
    inner: Box<dyn Read + Send>,
}

impl BodyStream {
    /// A stream that yields no bytes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Box::new(io::empty()),
        }
    }

    fn from_file(file: File, compression: Option<BodyCompression>) -> Self {
        let reader = BufReader::new(file);
        // Bodies may hold several concatenated gzip members.
        let inner: Box<dyn Read + Send> = if BodyCompression::is_gzip(compression) {
            Box::new(MultiGzDecoder::new(reader))
        } else {
            Box::new(reader)
        };
        Self { inner }
    }
}

impl Read for BodyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyStream").finish_non_exhaustive()
    }
}

/// Open the body at `path` for streaming.
///
/// A missing `path` yields an empty stream.
///
/// # Errors
///
/// Returns the I/O error raised when opening the file.
pub fn open_body(
    path: Option<&Path>,
    compression: Option<BodyCompression>,
) -> io::Result<BodyStream> {
    let Some(path) = path else {
        return Ok(BodyStream::empty());
    };
    debug!("opening body {} ({compression:?})", path.display());
    let file = File::open(path)?;
    Ok(BodyStream::from_file(file, compression))
}

/// Read the whole body at `path`, decoding it if compressed.
///
/// # Errors
///
/// Returns any I/O or decoding error hit while reading.
pub fn read_body(
    path: Option<&Path>,
    compression: Option<BodyCompression>,
) -> io::Result<Vec<u8>> {
    let mut stream = open_body(path, compression)?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    Ok(buf)
}
