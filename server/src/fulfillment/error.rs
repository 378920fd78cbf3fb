//! Status-sync errors

use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Field '{0}' is immutable after creation")]
    ImmutableField(&'static str),

    #[error("Status update timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotFound(what) => AppError::not_found(format!("{} not found", what)),
            SyncError::InvalidStatus(s) => AppError::validation(format!("Invalid status: {}", s)),
            SyncError::ImmutableField(field) => AppError::invalid_state(format!(
                "Field '{}' is immutable after creation",
                field
            )),
            SyncError::Timeout => AppError::Transient("status update timed out".to_string()),
            SyncError::Database(msg) => AppError::Database(msg),
        }
    }
}
