//! Error types for content operations.

use alumni_database::DatabaseError;
use thiserror::Error;

pub type ContentResult<T> = Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("File not found")]
    FileNotFound,

    #[error("{message}")]
    Validation { message: String },

    #[error("File storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
