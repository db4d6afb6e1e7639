//! Command execution helpers for `respctx`.
//!
//! Each sub-command loads a record, builds the response context and renders
//! one view of it to stdout.

use std::io::{self, ErrorKind, Write};

use anyhow::Context as _;
use log::{info, warn};
use respctx::bridge::{self, Reply};
use respctx::cli_args::{BodyArgs, CallArgs, HeaderArgs, RecordSource, ShowArgs};
use respctx::printer::{write_header_value, write_json, write_summary};
use respctx::{ResponseContext, ResponseRecord, init};
use serde_json::Value;

fn caused_by_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|c| {
        c.downcast_ref::<io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::BrokenPipe)
    })
}

/// Treat a closed stdout as a normal end of output.
fn ignore_broken_pipe(result: anyhow::Result<()>) -> anyhow::Result<()> {
    match result {
        Err(e) if caused_by_broken_pipe(&e) => Ok(()),
        other => other,
    }
}

fn load_context(args: &impl RecordSource) -> anyhow::Result<ResponseContext> {
    let path = args
        .record_path()
        .context("no response record given")?;
    let mut record = ResponseRecord::from_path(path)
        .with_context(|| format!("loading {}", path.display()))?;
    if let Some(root) = args.body_root() {
        record = record.with_body_root(root);
    }
    if record.body_path().is_none() {
        info!("record {} has no body file", path.display());
    }
    Ok(init(Some(record))?.response)
}

pub fn run_show(args: &ShowArgs) -> anyhow::Result<()> {
    let ctx = load_context(args)?;
    ignore_broken_pipe(write_summary(io::stdout().lock(), &ctx).map_err(Into::into))
}

/// Print the values of one header.
///
/// Returns `false` when the response has no such header.
pub fn run_header(args: &HeaderArgs) -> anyhow::Result<bool> {
    let ctx = load_context(args)?;
    let Some(value) = ctx.get_header(&args.name) else {
        warn!("header {} not present", args.name);
        return Ok(false);
    };
    ignore_broken_pipe(write_header_value(io::stdout().lock(), &value).map_err(Into::into))?;
    Ok(true)
}

pub fn run_body(args: &BodyArgs) -> anyhow::Result<()> {
    let ctx = load_context(args)?;
    let mut stream = ctx.get_body_stream()?;
    let mut out = io::stdout().lock();
    let copied = io::copy(&mut stream, &mut out)
        .and_then(|n| out.flush().map(|()| n))
        .context("writing body");
    ignore_broken_pipe(copied.map(|n| info!("wrote {n} body bytes")))
}

fn parse_call_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

pub fn run_call(args: &CallArgs) -> anyhow::Result<()> {
    let ctx = load_context(args)?;
    let call_args: Vec<Value> = args.args.iter().map(|a| parse_call_arg(a)).collect();
    let reply = bridge::invoke(&ctx, &args.method, &call_args)
        .with_context(|| format!("calling {}", args.method))?;
    let value = match reply {
        Reply::Value(v) => v,
        Reply::Stream(mut stream) => {
            let mut buf = Vec::new();
            io::copy(&mut stream, &mut buf).context("reading body stream")?;
            bridge::buffer_to_json(&buf)
        }
    };
    ignore_broken_pipe(write_json(io::stdout().lock(), &value, args.pretty).map_err(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("content-type", json!("content-type"))]
    #[case("\"quoted\"", json!("quoted"))]
    #[case("[1,2]", json!([1, 2]))]
    #[case("{\"type\":\"Buffer\",\"data\":[1]}", json!({"type": "Buffer", "data": [1]}))]
    fn call_args_prefer_json(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(parse_call_arg(raw), expected);
    }

    #[test]
    fn broken_pipe_is_detected_through_context() {
        let err = anyhow::Error::from(io::Error::from(ErrorKind::BrokenPipe)).context("writing");
        assert!(caused_by_broken_pipe(&err));
        assert!(ignore_broken_pipe(Err(err)).is_ok());
    }

    #[test]
    fn other_errors_are_kept() {
        let err = anyhow::anyhow!("boom");
        assert!(ignore_broken_pipe(Err(err)).is_err());
    }

    #[test]
    fn body_root_is_applied_when_loading() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("body.bin"), b"rooted").expect("write body");
        let record = dir.path().join("record.json");
        std::fs::write(&record, r#"{"bodyPath": "body.bin"}"#).expect("write record");
        let args = BodyArgs {
            record: Some(record),
            body_root: Some(dir.path().to_path_buf()),
        };
        let ctx = load_context(&args).expect("load context");
        assert_eq!(ctx.get_body().expect("body"), b"rooted");
    }
}
