//! Member directory and profile endpoints

use std::sync::Arc;

use alumni_database::User;
use alumni_users::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;
use crate::uploads::{read_file_field, store_image};

const PROFILE_PHOTO_FOLDER: &str = "profile_photos";

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoUploadResponse {
    pub message: String,
    pub profile_photo_url: String,
}

pub fn create_user_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/members", get(list_members).post(create_member))
        .route("/api/members/:member_id", get(get_member))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/:user_id", get(get_user).put(update_user))
        .route("/api/users/:user_id/upload-photo", post(upload_profile_photo))
}

#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    responses((status = 200, description = "All members"))
)]
pub async fn list_members(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<User>>> {
    let members = state.user_service.list_users(UserListQuery::default()).await?;
    Ok(Json(members))
}

#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    responses(
        (status = 200, description = "Member created"),
        (status = 400, description = "Invalid member or email already registered", body = ErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateUserRequest>,
) -> GatewayResult<Json<User>> {
    let member = state.user_service.create_user(payload).await?;
    Ok(Json(member))
}

#[utoipa::path(
    get,
    path = "/api/members/{member_id}",
    tag = "Members",
    params(("member_id" = String, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member details"),
        (status = 404, description = "Member not found", body = ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<Arc<GatewayState>>,
    Path(member_id): Path<String>,
) -> GatewayResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&member_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(
        ("cohort" = Option<String>, Query, description = "Exact cohort"),
        ("program_track" = Option<String>, Query, description = "Exact program track"),
        ("search" = Option<String>, Query, description = "Substring of name, email or bio"),
        ("limit" = Option<i64>, Query, description = "Page size, default 100"),
        ("skip" = Option<i64>, Query, description = "Users to skip")
    ),
    responses((status = 200, description = "Matching users ordered by name"))
)]
pub async fn list_users(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<UserListQuery>,
) -> GatewayResult<Json<Vec<User>>> {
    Ok(Json(state.user_service.list_users(query).await?))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "User created"),
        (status = 400, description = "Invalid user or email already registered", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateUserRequest>,
) -> GatewayResult<Json<User>> {
    Ok(Json(state.user_service.create_user(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<GatewayState>>,
    Path(user_id): Path<String>,
) -> GatewayResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated profile"),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<Arc<GatewayState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> GatewayResult<Json<User>> {
    Ok(Json(state.user_service.update_user(&user_id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/upload-photo",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Photo stored and linked to the profile", body = PhotoUploadResponse),
        (status = 400, description = "Not an image", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn upload_profile_photo(
    State(state): State<Arc<GatewayState>>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> GatewayResult<Json<PhotoUploadResponse>> {
    let user = state.user_service.get_user(&user_id).await?;
    let upload = read_file_field(&mut multipart).await?;
    let stored = store_image(&state.uploads, PROFILE_PHOTO_FOLDER, &upload).await?;

    state
        .user_service
        .set_profile_photo(&user.id, &stored.public_url)
        .await?;

    Ok(Json(PhotoUploadResponse {
        message: "Profile photo uploaded successfully".to_string(),
        profile_photo_url: stored.public_url,
    }))
}
