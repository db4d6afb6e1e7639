//! Error type shared by the response context and its collaborators.

use thiserror::Error;

/// Failures raised while building or using a response context.
///
/// Only [`ContextError::MissingResponse`] comes from initialisation; the
/// field getters never fail. Everything else originates from body storage,
/// record parsing or the sandbox bridge.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("contexts.response initialized without response")]
    MissingResponse,
    #[error("body I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not set body without existing body path")]
    MissingBodyPath,
    #[error("malformed response record at {path}: {message}")]
    Record { path: String, message: String },
    #[error("unknown response method: {0}")]
    UnknownMethod(String),
    #[error("invalid argument for {method}: {reason}")]
    InvalidArgument {
        method: &'static str,
        reason: String,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ContextError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Self::Record {
            path,
            message: err.into_inner().to_string(),
        }
    }
}
