//! Chat REST endpoints: rooms, history, conversations and image uploads.
//!
//! Live delivery happens over `/ws/chat`; these endpoints cover everything a
//! client loads before or beside the socket.

use std::sync::Arc;

use alumni_chats::CreateRoomRequest;
use alumni_database::{ChatMessage, ChatRoom, ConversationSummary};
use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;
use crate::uploads::{read_file_field, store_image};

const CHAT_IMAGE_FOLDER: &str = "chat_images";

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomsQuery {
    /// Only rooms this member may see; all rooms when absent.
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoomMessagesQuery {
    pub user_id: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DirectMessagesQuery {
    pub user_id: String,
    pub other_user_id: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MemberQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatImageResponse {
    pub message: String,
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnlineUsersResponse {
    pub online_users: Vec<String>,
}

pub fn create_chat_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/chat-rooms", get(list_rooms).post(create_room))
        .route("/api/chat-rooms/:room_id/messages", get(room_messages))
        .route("/api/direct-messages", get(direct_messages))
        .route("/api/direct-messages/conversations", get(conversations))
        .route("/api/chat-images/upload", post(upload_chat_image))
        .route("/api/chat/online", get(online_users))
}

#[utoipa::path(
    get,
    path = "/api/chat-rooms",
    tag = "Chat",
    params(RoomsQuery),
    responses(
        (status = 200, description = "Visible rooms ordered by name"),
        (status = 403, description = "Not a verified alumnus", body = ErrorResponse)
    )
)]
pub async fn list_rooms(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<RoomsQuery>,
) -> GatewayResult<Json<Vec<ChatRoom>>> {
    let rooms = match query.user_id.as_deref() {
        Some(user_id) => state.chat_service.rooms_for_user(user_id).await?,
        None => state.chat_service.list_rooms().await?,
    };
    Ok(Json(rooms))
}

#[utoipa::path(
    post,
    path = "/api/chat-rooms",
    tag = "Chat",
    responses(
        (status = 200, description = "Room created"),
        (status = 400, description = "Invalid room", body = ErrorResponse)
    )
)]
pub async fn create_room(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateRoomRequest>,
) -> GatewayResult<Json<ChatRoom>> {
    Ok(Json(state.chat_service.create_room(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/chat-rooms/{room_id}/messages",
    tag = "Chat",
    params(("room_id" = String, Path, description = "Room id"), RoomMessagesQuery),
    responses(
        (status = 200, description = "Recent messages, oldest first"),
        (status = 403, description = "Room not visible to this member", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse)
    )
)]
pub async fn room_messages(
    State(state): State<Arc<GatewayState>>,
    Path(room_id): Path<String>,
    Query(query): Query<RoomMessagesQuery>,
) -> GatewayResult<Json<Vec<ChatMessage>>> {
    let messages = state
        .chat_service
        .room_messages(&room_id, &query.user_id, query.limit)
        .await?;
    Ok(Json(messages))
}

#[utoipa::path(
    get,
    path = "/api/direct-messages",
    tag = "Chat",
    params(DirectMessagesQuery),
    responses(
        (status = 200, description = "Messages between the two members, oldest first"),
        (status = 403, description = "Not a verified alumnus", body = ErrorResponse)
    )
)]
pub async fn direct_messages(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<DirectMessagesQuery>,
) -> GatewayResult<Json<Vec<ChatMessage>>> {
    let messages = state
        .chat_service
        .direct_messages(&query.user_id, &query.other_user_id, query.limit)
        .await?;
    Ok(Json(messages))
}

#[utoipa::path(
    get,
    path = "/api/direct-messages/conversations",
    tag = "Chat",
    params(MemberQuery),
    responses(
        (status = 200, description = "One entry per counterpart, newest first"),
        (status = 403, description = "Not a verified alumnus", body = ErrorResponse)
    )
)]
pub async fn conversations(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<MemberQuery>,
) -> GatewayResult<Json<Vec<ConversationSummary>>> {
    Ok(Json(state.chat_service.conversations(&query.user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/chat-images/upload",
    tag = "Chat",
    params(MemberQuery),
    responses(
        (status = 200, description = "Image stored; send its URL in a later chat event", body = ChatImageResponse),
        (status = 400, description = "Not an image", body = ErrorResponse),
        (status = 403, description = "Not a verified alumnus", body = ErrorResponse)
    )
)]
pub async fn upload_chat_image(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<MemberQuery>,
    mut multipart: Multipart,
) -> GatewayResult<Json<ChatImageResponse>> {
    let member = state.chat_service.verified_member(&query.user_id).await?;
    let upload = read_file_field(&mut multipart).await?;
    let stored = store_image(&state.uploads, CHAT_IMAGE_FOLDER, &upload).await?;

    info!(user_id = %member.id, file_name = %stored.file_name, size = stored.size, "chat image uploaded");
    Ok(Json(ChatImageResponse {
        message: "Image uploaded successfully".to_string(),
        image_url: stored.public_url,
    }))
}

#[utoipa::path(
    get,
    path = "/api/chat/online",
    tag = "Chat",
    responses((status = 200, description = "Members with a live chat connection", body = OnlineUsersResponse))
)]
pub async fn online_users(State(state): State<Arc<GatewayState>>) -> Json<OnlineUsersResponse> {
    Json(OnlineUsersResponse {
        online_users: state.chat_hub.online_users().await,
    })
}
