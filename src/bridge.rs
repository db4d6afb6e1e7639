//! Name-based dispatch of the response functions for sandboxed plugins.
//!
//! Sandboxed code cannot hold Rust references, so it calls the context by
//! method name with JSON arguments and receives JSON back. Byte buffers use
//! the shape a Node `Buffer` serialises to:
//! `{"type": "Buffer", "data": [72, 105]}`.

use serde_json::{Value, json};

use crate::ContextError;
use crate::body::BodyStream;
use crate::context::ResponseContext;

/// Every function exposed in the `response` namespace.
pub const METHODS: [&str; 11] = [
    "getRequestId",
    "getStatusCode",
    "getStatusMessage",
    "getBytesRead",
    "getTime",
    "getHeader",
    "getHeaders",
    "hasHeader",
    "getBody",
    "getBodyStream",
    "setBody",
];

/// Outcome of a bridged call.
#[derive(Debug)]
pub enum Reply {
    Value(Value),
    /// `getBodyStream` hands back the reader itself.
    Stream(BodyStream),
}

impl Reply {
    /// The JSON value, if this reply carries one.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Stream(_) => None,
        }
    }
}

/// Encode bytes the way a Node `Buffer` serialises.
#[must_use]
pub fn buffer_to_json(bytes: &[u8]) -> Value {
    json!({ "type": "Buffer", "data": bytes })
}

fn bytes_from_array(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

/// Decode a body argument: a string, a byte array or a serialised `Buffer`.
fn buffer_from_json(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::String(s) => Some(s.as_bytes().to_vec()),
        Value::Array(items) => bytes_from_array(items),
        Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("Buffer") => {
            map.get("data")
                .and_then(Value::as_array)
                .and_then(|items| bytes_from_array(items))
        }
        _ => None,
    }
}

fn string_arg<'a>(method: &'static str, args: &'a [Value]) -> Result<&'a str, ContextError> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| ContextError::InvalidArgument {
            method,
            reason: "expected a header name string".into(),
        })
}

/// Call `method` on `ctx` with JSON `args`.
///
/// # Errors
///
/// Returns [`ContextError::UnknownMethod`] for names outside [`METHODS`],
/// [`ContextError::InvalidArgument`] for missing or mistyped arguments and
/// whatever the underlying accessor reports.
///
/// # Examples
///
/// ```
/// use respctx::bridge::invoke;
/// use respctx::{ResponseRecord, init};
/// use serde_json::json;
///
/// let ctx = init(Some(ResponseRecord::default())).expect("init");
/// let reply = invoke(&ctx.response, "getStatusCode", &[]).expect("call");
/// assert_eq!(reply.into_value(), Some(json!(0)));
/// ```
pub fn invoke(ctx: &ResponseContext, method: &str, args: &[Value]) -> Result<Reply, ContextError> {
    let value = match method {
        "getRequestId" => json!(ctx.get_request_id()),
        "getStatusCode" => json!(ctx.get_status_code()),
        "getStatusMessage" => json!(ctx.get_status_message()),
        "getBytesRead" => json!(ctx.get_bytes_read()),
        "getTime" => json!(ctx.get_time()),
        "getHeader" => {
            let name = string_arg("getHeader", args)?;
            serde_json::to_value(ctx.get_header(name))?
        }
        "getHeaders" => serde_json::to_value(ctx.get_headers())?,
        "hasHeader" => json!(ctx.has_header(string_arg("hasHeader", args)?)),
        "getBody" => buffer_to_json(&ctx.get_body()?),
        "getBodyStream" => return Ok(Reply::Stream(ctx.get_body_stream()?)),
        "setBody" => {
            let body = args.first().and_then(buffer_from_json).ok_or_else(|| {
                ContextError::InvalidArgument {
                    method: "setBody",
                    reason: "expected a string or Buffer".into(),
                }
            })?;
            ctx.set_body(&body)?;
            Value::Null
        }
        other => return Err(ContextError::UnknownMethod(other.to_owned())),
    };
    Ok(Reply::Value(value))
}
