use thiserror::Error;

use crate::domain::RepoError;

pub mod achievement;
pub mod matches;
pub mod player;

/// Failure of a workflow. Every kind carries a message suitable for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid match count: {0}")]
    InvalidCount(String),

    #[error("invalid player: {0}")]
    InvalidPlayer(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("database error: {0}")]
    Database(String),
}

impl RecordError {
    pub fn message(&self) -> &str {
        match self {
            RecordError::Validation(msg)
            | RecordError::InvalidCount(msg)
            | RecordError::InvalidPlayer(msg)
            | RecordError::NotFound(msg)
            | RecordError::AlreadyExists(msg)
            | RecordError::Database(msg) => msg,
        }
    }
}

impl From<RepoError> for RecordError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::StorageError(msg) => RecordError::Database(msg),
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Tags a storage failure with the operation that hit it.
pub(crate) fn storage_failure(operation: &str, e: RepoError) -> RecordError {
    log::error!("Failed to {}: {}", operation, e);
    match e {
        RepoError::StorageError(msg) => {
            RecordError::Database(format!("failed to {}: {}", operation, msg))
        }
    }
}
