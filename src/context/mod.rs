//! The `response` plugin context.
//!
//! Plugins receive a [`PluginContext`] whose `response` namespace exposes a
//! fixed set of read operations over a stored response plus `set_body`.
//! Each getter derives its value from the record on demand and substitutes
//! the zero value for anything the record leaves out.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::ContextError;
use crate::body::{self, BodyStream};
use crate::headers::{self, HeaderValue};
use crate::record::{Header, ResponseRecord};
use crate::store::{BodyStore, FsBodyStore};

/// Object handed to plugin code.
#[derive(Debug, Clone)]
pub struct PluginContext {
    pub response: ResponseContext,
}

impl PluginContext {
    /// Name under which the response functions are exposed.
    pub const NAMESPACE: &'static str = "response";
}

/// Build the plugin context for `response`, storing bodies on the filesystem.
///
/// # Errors
///
/// Returns [`ContextError::MissingResponse`] when no response is supplied.
/// An empty record is accepted.
///
/// # Examples
///
/// ```
/// use respctx::{ResponseRecord, init};
///
/// let ctx = init(Some(ResponseRecord::default())).expect("init");
/// assert_eq!(ctx.response.get_status_code(), 0);
/// assert!(init(None).is_err());
/// ```
pub fn init(response: Option<ResponseRecord>) -> Result<PluginContext, ContextError> {
    init_with_store(response, Arc::new(FsBodyStore))
}

/// Build the plugin context with a custom body store.
///
/// # Errors
///
/// Returns [`ContextError::MissingResponse`] when no response is supplied.
pub fn init_with_store(
    response: Option<ResponseRecord>,
    store: Arc<dyn BodyStore>,
) -> Result<PluginContext, ContextError> {
    let record = response.ok_or(ContextError::MissingResponse)?;
    debug!(
        "response context initialised for request {:?}",
        record.request_id()
    );
    Ok(PluginContext {
        response: ResponseContext {
            record: Arc::new(record),
            store,
        },
    })
}

/// Accessors over one response snapshot.
#[derive(Clone)]
pub struct ResponseContext {
    record: Arc<ResponseRecord>,
    store: Arc<dyn BodyStore>,
}

impl ResponseContext {
    /// The record this context reads from.
    #[must_use]
    pub fn record(&self) -> &ResponseRecord {
        &self.record
    }

    #[must_use]
    pub fn get_request_id(&self) -> &str {
        self.record.request_id().unwrap_or_default()
    }

    #[must_use]
    pub fn get_status_code(&self) -> u16 {
        self.record.status_code.unwrap_or_default()
    }

    #[must_use]
    pub fn get_status_message(&self) -> &str {
        self.record.status_message.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn get_bytes_read(&self) -> u64 {
        self.record.bytes_read.unwrap_or_default()
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn get_time(&self) -> u64 {
        self.record.elapsed_time.unwrap_or_default()
    }

    /// Look up a header by name, ignoring case.
    ///
    /// Returns `None` when nothing matches, a single value for one match and
    /// every value in order when the header repeats.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<HeaderValue<'_>> {
        headers::find_header(self.get_headers(), name)
    }

    /// All headers in the order they were received.
    #[must_use]
    pub fn get_headers(&self) -> &[Header] {
        self.record.headers.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        headers::has_header(self.get_headers(), name)
    }

    /// The decoded body, empty when the record has no body file.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] when the body file cannot be read or
    /// decoded.
    pub fn get_body(&self) -> Result<Vec<u8>, ContextError> {
        Ok(body::read_body(
            self.record.body_path(),
            self.record.body_compression,
        )?)
    }

    /// A fresh reader over the decoded body.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] when the body file cannot be opened.
    pub fn get_body_stream(&self) -> Result<BodyStream, ContextError> {
        Ok(body::open_body(
            self.record.body_path(),
            self.record.body_compression,
        )?)
    }

    /// Replace the stored body through the configured [`BodyStore`].
    ///
    /// The snapshot held by this context is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the store's error, e.g. [`ContextError::MissingBodyPath`].
    pub fn set_body(&self, body: &[u8]) -> Result<u64, ContextError> {
        self.store.write_body(&self.record, body)
    }
}

impl fmt::Debug for ResponseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseContext")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
