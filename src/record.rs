//! Persisted response records.
//!
//! A record is the stored result of a finished HTTP exchange. It is written
//! by the persistence layer as camelCase JSON; every field may be missing,
//! so each one is kept optional here and defaulted by the accessors in
//! [`crate::context`].

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ContextError;

/// A single response header as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Encoding applied to the body file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyCompression {
    /// The body file is a gzip stream.
    Zip,
    /// Legacy records written before compression existed; the body is raw.
    #[serde(rename = "__NEEDS_MIGRATION__")]
    NeedsMigration,
}

impl BodyCompression {
    /// Whether the body file must be gunzipped.
    #[must_use]
    pub fn is_gzip(compression: Option<Self>) -> bool {
        matches!(compression, Some(Self::Zip))
    }
}

/// Snapshot of a stored response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Identifier of the request that produced this response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// The persisted model's name for the request id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_read: Option<u64>,
    /// Decoded body length; `-1` marks records that never recorded it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_content: Option<i64>,
    /// Round-trip time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,
    /// Body file location; stored records use `""` for "no body".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_path: Option<PathBuf>,
    #[serde(default)]
    pub body_compression: Option<BodyCompression>,
    /// Transport error recorded instead of a response, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

impl ResponseRecord {
    /// The request id, falling back to the persisted `parentId`.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref().or(self.parent_id.as_deref())
    }

    /// The body file, treating an empty path as no body.
    #[must_use]
    pub fn body_path(&self) -> Option<&Path> {
        self.body_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Parse a record from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Record`] naming the offending JSON path when
    /// the document does not describe a response.
    pub fn from_json_str(json: &str) -> Result<Self, ContextError> {
        let de = &mut serde_json::Deserializer::from_str(json);
        Ok(serde_path_to_error::deserialize(de)?)
    }

    /// Read and parse a record stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Io`] when the file cannot be read and
    /// [`ContextError::Record`] when its contents are malformed.
    pub fn from_path(path: &Path) -> Result<Self, ContextError> {
        debug!("loading response record from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Resolve a relative `body_path` against `root`.
    ///
    /// Absolute paths and records without a body are returned unchanged.
    #[must_use]
    pub fn with_body_root(mut self, root: &Path) -> Self {
        let resolved = self
            .body_path()
            .filter(|p| p.is_relative())
            .map(|p| root.join(p));
        if resolved.is_some() {
            self.body_path = resolved;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_stored_record() {
        let json = r#"{
            "_id": "res_1",
            "parentId": "req_1",
            "url": "https://example.com",
            "statusCode": 200,
            "statusMessage": "OK",
            "bytesRead": 123,
            "elapsedTime": 321,
            "headers": [{"name": "content-type", "value": "text/plain"}],
            "bodyPath": "/tmp/body",
            "bodyCompression": "zip",
            "somethingElse": true
        }"#;
        let record = ResponseRecord::from_json_str(json).expect("parse record");
        assert_eq!(record.request_id(), Some("req_1"));
        assert_eq!(record.status_code, Some(200));
        assert_eq!(record.elapsed_time, Some(321));
        assert_eq!(record.body_compression, Some(BodyCompression::Zip));
        assert_eq!(
            record.headers,
            Some(vec![Header::new("content-type", "text/plain")])
        );
    }

    #[test]
    fn parses_freshly_initialised_model() {
        let json = r#"{
            "_id": "res_2",
            "type": "Response",
            "parentId": "req_2",
            "modified": 1700000000000,
            "created": 1700000000000,
            "isPrivate": false,
            "statusCode": 0,
            "statusMessage": "",
            "httpVersion": "",
            "contentType": "",
            "url": "",
            "bytesRead": 0,
            "bytesContent": -1,
            "elapsedTime": 0,
            "headers": [],
            "timelinePath": "",
            "bodyPath": "",
            "bodyCompression": "__NEEDS_MIGRATION__",
            "error": "",
            "requestVersionId": null,
            "settingStoreCookies": null,
            "settingSendCookies": null,
            "environmentId": null
        }"#;
        let record = ResponseRecord::from_json_str(json).expect("parse record");
        assert_eq!(record.bytes_content, Some(-1));
        assert_eq!(record.body_compression, Some(BodyCompression::NeedsMigration));
        assert!(!BodyCompression::is_gzip(record.body_compression));
        assert_eq!(record.body_path(), None);
        assert_eq!(record.request_id(), Some("req_2"));
    }

    #[rstest]
    #[case(r#"{"requestId": "a", "parentId": "b"}"#, Some("a"))]
    #[case(r#"{"parentId": "b"}"#, Some("b"))]
    #[case(r#"{"requestId": "a"}"#, Some("a"))]
    #[case("{}", None)]
    fn request_id_prefers_explicit_field(#[case] json: &str, #[case] expected: Option<&str>) {
        let record = ResponseRecord::from_json_str(json).expect("parse record");
        assert_eq!(record.request_id(), expected);
    }

    #[test]
    fn empty_body_path_means_no_body() {
        let record = ResponseRecord::from_json_str(r#"{"bodyPath": ""}"#)
            .expect("parse record")
            .with_body_root(Path::new("/data/responses"));
        assert_eq!(record.body_path(), None);
    }

    #[test]
    fn empty_object_parses_to_default() {
        let record = ResponseRecord::from_json_str("{}").expect("parse record");
        assert_eq!(record, ResponseRecord::default());
    }

    #[test]
    fn null_compression_means_raw() {
        let record =
            ResponseRecord::from_json_str(r#"{"bodyCompression": null}"#).expect("parse record");
        assert_eq!(record.body_compression, None);
    }

    #[rstest]
    #[case("body.bin", "/data/responses/body.bin")]
    #[case("/abs/body.bin", "/abs/body.bin")]
    fn body_root_only_applies_to_relative_paths(#[case] stored: &str, #[case] expected: &str) {
        let record = ResponseRecord {
            body_path: Some(PathBuf::from(stored)),
            ..ResponseRecord::default()
        }
        .with_body_root(Path::new("/data/responses"));
        assert_eq!(record.body_path, Some(PathBuf::from(expected)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ResponseRecord::from_path(&dir.path().join("absent.json"))
            .expect_err("missing record");
        assert!(matches!(err, ContextError::Io(_)));
    }
}
