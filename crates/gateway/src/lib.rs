//! # Alumni Gateway Crate
//!
//! HTTP REST and WebSocket entry point of the alumni backend. Requests are
//! routed to the domain services (events, users, payments, shop, content and
//! chats) held in [`GatewayState`].
//!
//! ## Architecture
//!
//! - **REST**: `/api/...` endpoints with OpenAPI documentation
//! - **WebSocket**: `/ws/chat`, one realtime chat session per socket
//! - **Uploads**: stored files served back under the configured public path
//! - **Middleware**: CORS and request logging
//!
//! ## Usage
//!
//! ```rust,ignore
//! use alumni_gateway::{create_router, GatewayState};
//!
//! let state = GatewayState::new(pool, config, provider);
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8001").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod uploads;
pub mod websocket;

pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use state::GatewayState;

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let cors = middleware::create_cors_layer(&state.config.cors);
    let body_limit = state
        .config
        .uploads
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let uploads_path = uploads_mount_path(&state.config.uploads.public_path);
    let uploads_dir = ServeDir::new(state.uploads.root());

    let arc_state = Arc::new(state);
    #[allow(unused_mut)]
    let mut router = Router::new()
        // REST API routes
        .merge(rest::create_rest_routes().with_state(arc_state.clone()))
        // WebSocket routes
        .merge(websocket::create_websocket_routes().with_state(arc_state))
        // Uploaded files
        .nest_service(&uploads_path, uploads_dir)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        // Logging middleware
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    // Add Swagger UI if in debug mode
    #[cfg(debug_assertions)]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health_check,
                rest::health::api_root,
                rest::events::list_events,
                rest::events::create_event,
                rest::events::get_event,
                rest::events::delete_event,
                rest::events::register_for_event,
                rest::events::list_registrations,
                rest::events::cancel_registration,
                rest::events::list_user_events,
                rest::users::list_members,
                rest::users::create_member,
                rest::users::get_member,
                rest::users::list_users,
                rest::users::create_user,
                rest::users::get_user,
                rest::users::update_user,
                rest::users::upload_profile_photo,
                rest::payments::create_checkout_session,
                rest::payments::checkout_status,
                rest::shop::list_products,
                rest::shop::create_product,
                rest::shop::get_product,
                rest::shop::add_to_cart,
                rest::shop::get_cart,
                rest::shop::remove_cart_item,
                rest::shop::clear_cart,
                rest::shop::shop_checkout,
                rest::shop::list_orders,
                rest::content::list_news,
                rest::content::create_news_post,
                rest::content::get_news_post,
                rest::content::list_newsletters,
                rest::content::create_newsletter,
                rest::content::get_newsletter,
                rest::content::upload_newsletter_pdf,
                rest::content::download_newsletter_pdf,
                rest::content::list_documents,
                rest::content::create_document,
                rest::content::get_document,
                rest::content::upload_document_file,
                rest::content::download_document_file,
                rest::content::submit_contact,
                rest::content::list_contact_submissions,
                rest::content::subscribe,
                rest::content::list_subscribers,
                rest::chat::list_rooms,
                rest::chat::create_room,
                rest::chat::room_messages,
                rest::chat::direct_messages,
                rest::chat::conversations,
                rest::chat::upload_chat_image,
                rest::chat::online_users,
            ),
            components(
                schemas(
                    ErrorResponse,
                    rest::health::HealthResponse,
                    rest::health::MessageResponse,
                    rest::users::PhotoUploadResponse,
                    rest::shop::CartCleared,
                    rest::content::SubscribeRequest,
                    rest::chat::ChatImageResponse,
                    rest::chat::OnlineUsersResponse,
                )
            ),
            tags(
                (name = "Health", description = "Liveness and service banner"),
                (name = "Events", description = "Events, registrations and the waitlist"),
                (name = "Members", description = "Member records"),
                (name = "Users", description = "Directory and profiles"),
                (name = "Payments", description = "Membership checkout"),
                (name = "Shop", description = "Catalog, cart and shop checkout"),
                (name = "News", description = "News posts"),
                (name = "Newsletters", description = "Monthly newsletters"),
                (name = "Documents", description = "Governance documents"),
                (name = "Contact", description = "Contact form and newsletter subscriptions"),
                (name = "Chat", description = "Chat rooms, direct messages and presence"),
            )
        )]
        struct ApiDoc;

        router = router
            .merge(SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
            );
    }

    router
}

/// Normalise the configured public path into a mount point axum accepts.
fn uploads_mount_path(public_path: &str) -> String {
    let trimmed = public_path.trim().trim_end_matches('/');
    match trimmed {
        "" => "/uploads".to_string(),
        path if path.starts_with('/') => path.to_string(),
        path => format!("/{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_mount_path_is_absolute_without_trailing_slash() {
        assert_eq!(uploads_mount_path("/uploads/"), "/uploads");
        assert_eq!(uploads_mount_path("files"), "/files");
        assert_eq!(uploads_mount_path("/"), "/uploads");
    }
}
