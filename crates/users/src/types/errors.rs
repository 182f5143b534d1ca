//! Error types for user and membership operations.

use alumni_database::DatabaseError;
use alumni_payments::PaymentError;
use thiserror::Error;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound { id: String },

    #[error("Member with this email already exists")]
    EmailAlreadyExists,

    #[error("Invalid membership tier")]
    InvalidMembershipTier,

    #[error("Validation error: {0}")]
    ValidationFailed(String),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for UserError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Duplicate(_) => UserError::EmailAlreadyExists,
            other => UserError::Database(other),
        }
    }
}
