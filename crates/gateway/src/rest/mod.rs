//! REST API endpoints for the gateway

pub mod chat;
pub mod content;
pub mod events;
pub mod health;
pub mod payments;
pub mod shop;
pub mod users;

use axum::Router;
use crate::state::GatewayState;
use std::sync::Arc;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(health::create_health_routes())
        .merge(events::create_event_routes())
        .merge(users::create_user_routes())
        .merge(payments::create_payment_routes())
        .merge(shop::create_shop_routes())
        .merge(content::create_content_routes())
        .merge(chat::create_chat_routes())
}
