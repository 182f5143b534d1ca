//! Error types for event operations.

use alumni_database::DatabaseError;
use thiserror::Error;

pub type EventResult<T> = Result<T, EventError>;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    EventNotFound { id: String },

    #[error("Registration not found")]
    RegistrationNotFound { id: String },

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Registration is closed: {reason}")]
    EventClosed { reason: String },

    #[error("Registration already cancelled")]
    AlreadyCancelled,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl EventError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn closed(reason: impl Into<String>) -> Self {
        Self::EventClosed {
            reason: reason.into(),
        }
    }
}

impl From<DatabaseError> for EventError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Duplicate(_) => EventError::AlreadyRegistered,
            other => EventError::Database(other),
        }
    }
}
