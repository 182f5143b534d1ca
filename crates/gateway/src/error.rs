//! Error types for the gateway layer

use alumni_chats::ChatError;
use alumni_content::ContentError;
use alumni_database::DatabaseError;
use alumni_events::EventError;
use alumni_payments::PaymentError;
use alumni_shop::ShopError;
use alumni_users::UserError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Payment provider error: {0}")]
    PaymentProvider(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            GatewayError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::DatabaseError(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        }

        let error_response = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<DatabaseError> for GatewayError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(what) => GatewayError::NotFound(format!("{what} not found")),
            DatabaseError::Duplicate(_) | DatabaseError::Conflict(_) => {
                GatewayError::Conflict(error.to_string())
            }
            other => GatewayError::DatabaseError(other.to_string()),
        }
    }
}

impl From<PaymentError> for GatewayError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::NotConfigured => {
                GatewayError::ServiceUnavailable("Payments are not configured".to_string())
            }
            PaymentError::InvalidRequest(message) => GatewayError::InvalidRequest(message),
            PaymentError::SessionNotFound(_) => GatewayError::NotFound(error.to_string()),
            other => GatewayError::PaymentProvider(other.to_string()),
        }
    }
}

impl From<EventError> for GatewayError {
    fn from(error: EventError) -> Self {
        match error {
            EventError::EventNotFound { .. } | EventError::RegistrationNotFound { .. } => {
                GatewayError::NotFound(error.to_string())
            }
            EventError::AlreadyRegistered => GatewayError::Conflict(error.to_string()),
            EventError::EventClosed { .. }
            | EventError::AlreadyCancelled
            | EventError::Validation { .. } => GatewayError::InvalidRequest(error.to_string()),
            EventError::Database(inner) => inner.into(),
        }
    }
}

impl From<UserError> for GatewayError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UserNotFound { .. } => GatewayError::NotFound(error.to_string()),
            UserError::EmailAlreadyExists
            | UserError::InvalidMembershipTier
            | UserError::ValidationFailed(_) => GatewayError::InvalidRequest(error.to_string()),
            UserError::Payment(inner) => inner.into(),
            UserError::Database(inner) => inner.into(),
        }
    }
}

impl From<ShopError> for GatewayError {
    fn from(error: ShopError) -> Self {
        match error {
            ShopError::ProductNotFound { .. } | ShopError::CartItemNotFound { .. } => {
                GatewayError::NotFound(error.to_string())
            }
            ShopError::EmptyCart | ShopError::Validation { .. } => {
                GatewayError::InvalidRequest(error.to_string())
            }
            ShopError::Payment(inner) => inner.into(),
            ShopError::Database(inner) => inner.into(),
        }
    }
}

impl From<ContentError> for GatewayError {
    fn from(error: ContentError) -> Self {
        match error {
            ContentError::NotFound { .. } | ContentError::FileNotFound => {
                GatewayError::NotFound(error.to_string())
            }
            ContentError::Validation { .. } => GatewayError::InvalidRequest(error.to_string()),
            ContentError::Storage(inner) => {
                GatewayError::InternalError(format!("Upload storage failed: {inner}"))
            }
            ContentError::Database(inner) => inner.into(),
        }
    }
}

impl From<ChatError> for GatewayError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::RoomNotFound { .. } | ChatError::UserNotFound { .. } => {
                GatewayError::NotFound(error.to_string())
            }
            ChatError::AccessDenied { .. } => GatewayError::Forbidden(error.to_string()),
            ChatError::Validation { .. } => GatewayError::InvalidRequest(error.to_string()),
            ChatError::Database(inner) => inner.into(),
        }
    }
}

impl From<MultipartError> for GatewayError {
    fn from(error: MultipartError) -> Self {
        GatewayError::InvalidRequest(format!("Invalid multipart body: {}", error.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_distinct_statuses() {
        let cases: Vec<(GatewayError, StatusCode)> = vec![
            (
                EventError::EventNotFound { id: "e1".into() }.into(),
                StatusCode::NOT_FOUND,
            ),
            (EventError::AlreadyRegistered.into(), StatusCode::CONFLICT),
            (
                EventError::closed("event has already taken place").into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ChatError::unverified().into(),
                StatusCode::FORBIDDEN,
            ),
            (
                ShopError::Payment(PaymentError::NotConfigured).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                UserError::Payment(PaymentError::Provider {
                    status: 402,
                    message: "card declined".into(),
                })
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[test]
    fn messages_carry_the_domain_text() {
        let error: GatewayError = EventError::EventNotFound { id: "e1".into() }.into();
        assert_eq!(error.to_string(), "Event not found");

        let error: GatewayError = ChatError::unverified().into();
        assert_eq!(error.to_string(), "Access denied. Verified alumni only.");
    }
}
