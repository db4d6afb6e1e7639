//! Terminal rendering for response contexts.
//!
//! All writers take any [`Write`] so tests can render into a buffer.

use std::io::{self, Write};

use chrono::DateTime;
use serde_json::Value;

use crate::context::ResponseContext;
use crate::headers::HeaderValue;

/// Write a human-readable summary of the response.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
///
/// # Examples
///
/// ```
/// use respctx::printer::write_summary;
/// use respctx::{ResponseRecord, init};
///
/// let record = ResponseRecord { status_code: Some(204), ..Default::default() };
/// let ctx = init(Some(record)).expect("init");
/// let mut out = Vec::new();
/// write_summary(&mut out, &ctx.response).expect("write");
/// assert!(String::from_utf8(out).expect("utf8").contains("Status:   204"));
/// ```
pub fn write_summary<W: Write>(mut out: W, ctx: &ResponseContext) -> io::Result<()> {
    let record = ctx.record();
    writeln!(out, "Request:  {}", ctx.get_request_id())?;
    if let Some(url) = &record.url {
        writeln!(out, "URL:      {url}")?;
    }
    writeln!(
        out,
        "Status:   {} {}",
        ctx.get_status_code(),
        ctx.get_status_message()
    )?;
    writeln!(
        out,
        "Received: {} bytes in {} ms",
        ctx.get_bytes_read(),
        ctx.get_time()
    )?;
    if let Some(created) = record.created.and_then(DateTime::from_timestamp_millis) {
        writeln!(out, "Created:  {}", created.to_rfc3339())?;
    }
    if let Some(err) = &record.error {
        writeln!(out, "Error:    {err}")?;
    }
    let headers = ctx.get_headers();
    if headers.is_empty() {
        return Ok(());
    }
    writeln!(out, "Headers:")?;
    for h in headers {
        writeln!(out, "  {}: {}", h.name, h.value)?;
    }
    Ok(())
}

/// Write each header value on its own line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_header_value<W: Write>(mut out: W, value: &HeaderValue<'_>) -> io::Result<()> {
    for v in value.values() {
        writeln!(out, "{v}")?;
    }
    Ok(())
}

/// Write a bridge reply as JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialisation or writing fails.
pub fn write_json<W: Write>(mut out: W, value: &Value, pretty: bool) -> io::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(io::Error::other)?;
    writeln!(out, "{text}")
}
