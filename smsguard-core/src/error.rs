//! Error types for smsguard-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for model and prediction operations.
pub type Result<T> = std::result::Result<T, SmsGuardError>;

/// Errors raised while loading model artifacts or classifying a message.
///
/// Text normalization itself is total and has no error path.
#[derive(Error, Debug)]
pub enum SmsGuardError {
    /// An artifact could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact is not valid JSON or does not match the expected layout.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An artifact parsed but its contents are inconsistent.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Models were not loaded, so no prediction can be made.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The message was empty or whitespace only.
    #[error("message is empty")]
    EmptyMessage,
}

impl SmsGuardError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SmsGuardError::InvalidModel(msg.into())
    }
}
