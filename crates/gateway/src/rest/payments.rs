//! Membership checkout endpoints

use std::sync::Arc;

use alumni_users::{MembershipCheckout, MembershipCheckoutRequest, MembershipStatus};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;

pub fn create_payment_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/api/payments/create-checkout-session",
            post(create_checkout_session),
        )
        .route(
            "/api/payments/checkout-status/:session_id",
            get(checkout_status),
        )
}

#[utoipa::path(
    post,
    path = "/api/payments/create-checkout-session",
    tag = "Payments",
    responses(
        (status = 200, description = "Free tier activated, or a hosted checkout URL for paid tiers"),
        (status = 400, description = "Unknown tier or invalid member details", body = ErrorResponse),
        (status = 502, description = "Payment provider failed", body = ErrorResponse),
        (status = 503, description = "Payments not configured", body = ErrorResponse)
    )
)]
pub async fn create_checkout_session(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<MembershipCheckoutRequest>,
) -> GatewayResult<Json<MembershipCheckout>> {
    let checkout = state.membership_service.start_checkout(payload).await?;
    Ok(Json(checkout))
}

#[utoipa::path(
    get,
    path = "/api/payments/checkout-status/{session_id}",
    tag = "Payments",
    params(("session_id" = String, Path, description = "Checkout session id")),
    responses(
        (status = 200, description = "Current session and payment status"),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 502, description = "Payment provider failed", body = ErrorResponse)
    )
)]
pub async fn checkout_status(
    State(state): State<Arc<GatewayState>>,
    Path(session_id): Path<String>,
) -> GatewayResult<Json<MembershipStatus>> {
    let status = state.membership_service.checkout_status(&session_id).await?;
    Ok(Json(status))
}
