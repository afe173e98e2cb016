//! Error types for the records crate.

use thiserror::Error;

/// Record error type covering snapshot encoding failures.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Failed to serialize a snapshot.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Failed to deserialize a snapshot.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_eof() || err.is_syntax() {
            RecordError::Deserialization(err.to_string())
        } else {
            RecordError::Serialization(err.to_string())
        }
    }
}
