//! Error types for catalog, cart and checkout operations.

use alumni_database::DatabaseError;
use alumni_payments::PaymentError;
use thiserror::Error;

pub type ShopResult<T> = Result<T, ShopError>;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("Product not found")]
    ProductNotFound { id: String },

    #[error("Cart item not found")]
    CartItemNotFound { id: String },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("{message}")]
    Validation { message: String },

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ShopError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
