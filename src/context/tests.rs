//! Unit tests for the response context.

use super::*;

use std::io::Read;
use std::sync::Mutex;

use rstest::{fixture, rstest};

use crate::record::BodyCompression;

#[derive(Default)]
struct RecordingStore {
    writes: Mutex<Vec<(Option<String>, Vec<u8>)>>,
}

impl BodyStore for RecordingStore {
    fn write_body(&self, record: &ResponseRecord, body: &[u8]) -> Result<u64, ContextError> {
        self.writes
            .lock()
            .expect("lock writes")
            .push((record.request_id.clone(), body.to_vec()));
        Ok(u64::try_from(body.len()).expect("body length fits"))
    }
}

#[fixture]
fn full_record() -> ResponseRecord {
    ResponseRecord {
        request_id: Some("req_9".into()),
        status_code: Some(404),
        status_message: Some("Not Found".into()),
        bytes_read: Some(10),
        elapsed_time: Some(20),
        headers: Some(vec![Header::new("X-Trace", "abc")]),
        ..ResponseRecord::default()
    }
}

#[test]
fn init_without_response_fails() {
    let err = init(None).expect_err("missing response");
    assert!(matches!(err, ContextError::MissingResponse));
}

#[rstest]
fn getters_return_record_fields(full_record: ResponseRecord) {
    let ctx = init(Some(full_record)).expect("init").response;
    assert_eq!(ctx.get_request_id(), "req_9");
    assert_eq!(ctx.get_status_code(), 404);
    assert_eq!(ctx.get_status_message(), "Not Found");
    assert_eq!(ctx.get_bytes_read(), 10);
    assert_eq!(ctx.get_time(), 20);
    assert_eq!(ctx.get_header("x-trace"), Some(HeaderValue::Single("abc")));
}

#[test]
fn empty_record_yields_zero_values() {
    let ctx = init(Some(ResponseRecord::default())).expect("init").response;
    assert_eq!(ctx.get_request_id(), "");
    assert_eq!(ctx.get_status_message(), "");
    assert_eq!(ctx.get_status_code(), 0);
    assert!(ctx.get_headers().is_empty());
    assert_eq!(ctx.get_header("anything"), None);
    assert!(ctx.get_body().expect("empty body").is_empty());
    let mut streamed = Vec::new();
    ctx.get_body_stream()
        .expect("empty stream")
        .read_to_end(&mut streamed)
        .expect("drain stream");
    assert!(streamed.is_empty());
}

#[rstest]
fn getters_are_idempotent(full_record: ResponseRecord) {
    let ctx = init(Some(full_record)).expect("init").response;
    assert_eq!(ctx.get_request_id(), ctx.get_request_id());
    assert_eq!(ctx.get_headers(), ctx.get_headers());
    assert_eq!(ctx.get_header("X-TRACE"), ctx.get_header("X-TRACE"));
    assert_eq!(ctx.get_body().expect("body"), ctx.get_body().expect("body"));
}

#[test]
fn stream_matches_materialised_body() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("body");
    std::fs::write(&path, b"streamed content").expect("write body");
    let record = ResponseRecord {
        body_path: Some(path),
        ..ResponseRecord::default()
    };
    let ctx = init(Some(record)).expect("init").response;
    let mut streamed = Vec::new();
    ctx.get_body_stream()
        .expect("open stream")
        .read_to_end(&mut streamed)
        .expect("drain stream");
    assert_eq!(streamed, ctx.get_body().expect("body"));
}

#[test]
fn missing_body_file_propagates_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let record = ResponseRecord {
        body_path: Some(dir.path().join("missing")),
        body_compression: Some(BodyCompression::Zip),
        ..ResponseRecord::default()
    };
    let ctx = init(Some(record)).expect("init").response;
    assert!(matches!(ctx.get_body(), Err(ContextError::Io(_))));
    assert!(matches!(ctx.get_body_stream(), Err(ContextError::Io(_))));
}

#[rstest]
fn set_body_delegates_to_store(full_record: ResponseRecord) {
    let store = Arc::new(RecordingStore::default());
    let ctx = init_with_store(Some(full_record.clone()), store.clone())
        .expect("init")
        .response;

    let written = ctx.set_body(b"replacement").expect("set body");

    assert_eq!(written, 11);
    let writes = store.writes.lock().expect("lock writes");
    assert_eq!(
        writes.as_slice(),
        &[(Some("req_9".to_owned()), b"replacement".to_vec())]
    );
    assert_eq!(ctx.record(), &full_record);
}

#[test]
fn context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResponseContext>();
}

#[test]
fn empty_body_path_reads_as_no_body() {
    let record = ResponseRecord::from_json_str(r#"{"bodyPath": "", "bodyCompression": "zip"}"#)
        .expect("parse record");
    let ctx = init(Some(record)).expect("init").response;
    assert!(ctx.get_body().expect("empty body").is_empty());
    let mut streamed = Vec::new();
    ctx.get_body_stream()
        .expect("empty stream")
        .read_to_end(&mut streamed)
        .expect("drain stream");
    assert!(streamed.is_empty());
    assert!(matches!(ctx.set_body(b"x"), Err(ContextError::MissingBodyPath)));
}

#[test]
fn request_id_falls_back_to_parent_id() {
    let record =
        ResponseRecord::from_json_str(r#"{"parentId": "req_parent"}"#).expect("parse record");
    let ctx = init(Some(record)).expect("init").response;
    assert_eq!(ctx.get_request_id(), "req_parent");
}
