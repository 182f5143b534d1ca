//! Error types for the chat system.

use alumni_database::DatabaseError;
use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat room not found")]
    RoomNotFound { id: String },

    #[error("User not found")]
    UserNotFound { id: String },

    #[error("{reason}")]
    AccessDenied { reason: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ChatError {
    pub fn room_not_found(id: impl Into<String>) -> Self {
        Self::RoomNotFound { id: id.into() }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Only verified alumni may use chat.
    pub fn unverified() -> Self {
        Self::access_denied("Access denied. Verified alumni only.")
    }
}
