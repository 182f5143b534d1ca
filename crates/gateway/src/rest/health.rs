use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn create_health_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api", get(api_root))
        .route("/api/", get(api_root))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[utoipa::path(
    get,
    path = "/api/",
    tag = "Health",
    responses(
        (status = 200, description = "Service banner", body = MessageResponse)
    )
)]
pub async fn api_root() -> Json<MessageResponse> {
    Json(MessageResponse::new("ICAA Alumni Portal API"))
}
