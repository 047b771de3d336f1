use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Keyword must not be empty")]
    EmptyKeyword,

    #[error("Length must be between 4 and 150 words, got {0}")]
    LengthOutOfRange(u16),

    #[error("Generated text must not be empty")]
    EmptyText,

    #[error("Tag must not be empty")]
    EmptyTag,
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("No record with id {0}")]
    NotFound(Uuid),

    #[error("History file {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("History file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for HistoryError {
    fn from(err: tempfile::PersistError) -> Self {
        HistoryError::Io(err.error)
    }
}
