//! News, newsletters, documents, contact form and subscriber endpoints

use std::sync::Arc;

use alumni_content::{
    ContactReceipt, CreateContactRequest, CreateDocumentRequest, CreateNewsPostRequest,
    CreateNewsletterRequest, DocumentQuery, FileDownload, NewsQuery, PdfUploadReceipt,
    SubscribeReceipt,
};
use alumni_database::{ContactSubmission, Document, NewsPost, Newsletter, NewsletterSubscriber};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;
use crate::uploads::read_file_field;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub email: String,
}

pub fn create_content_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/news", get(list_news).post(create_news_post))
        .route("/api/news/:post_id", get(get_news_post))
        .route("/api/newsletters", get(list_newsletters).post(create_newsletter))
        .route("/api/newsletters/:newsletter_id", get(get_newsletter))
        .route(
            "/api/newsletters/:newsletter_id/upload-pdf",
            post(upload_newsletter_pdf),
        )
        .route("/api/newsletters/:newsletter_id/pdf", get(download_newsletter_pdf))
        .route("/api/documents", get(list_documents).post(create_document))
        .route("/api/documents/:document_id", get(get_document))
        .route("/api/documents/:document_id/upload", post(upload_document_file))
        .route("/api/documents/:document_id/file", get(download_document_file))
        .route("/api/contact", get(list_contact_submissions).post(submit_contact))
        .route("/api/newsletter/subscribe", post(subscribe))
        .route("/api/newsletter/subscribers", get(list_subscribers))
}

/// Send stored bytes as an attachment download.
fn attachment(download: FileDownload) -> Response {
    let file_name: String = download
        .download_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();

    (
        [
            (header::CONTENT_TYPE, download.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        download.bytes,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/news",
    tag = "News",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 10"),
        ("skip" = Option<i64>, Query, description = "Posts to skip")
    ),
    responses((status = 200, description = "Published posts, newest first"))
)]
pub async fn list_news(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<NewsQuery>,
) -> GatewayResult<Json<Vec<NewsPost>>> {
    Ok(Json(state.news_service.list_posts(&query).await?))
}

#[utoipa::path(
    post,
    path = "/api/news",
    tag = "News",
    responses(
        (status = 200, description = "Post published"),
        (status = 400, description = "Invalid post", body = ErrorResponse)
    )
)]
pub async fn create_news_post(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateNewsPostRequest>,
) -> GatewayResult<Json<NewsPost>> {
    Ok(Json(state.news_service.create_post(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/news/{post_id}",
    tag = "News",
    params(("post_id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post"),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn get_news_post(
    State(state): State<Arc<GatewayState>>,
    Path(post_id): Path<String>,
) -> GatewayResult<Json<NewsPost>> {
    Ok(Json(state.news_service.get_post(&post_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/newsletters",
    tag = "Newsletters",
    responses((status = 200, description = "Newsletters, most recent month first"))
)]
pub async fn list_newsletters(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<Newsletter>>> {
    Ok(Json(state.newsletter_service.list_newsletters().await?))
}

#[utoipa::path(
    post,
    path = "/api/newsletters",
    tag = "Newsletters",
    responses(
        (status = 200, description = "Newsletter created"),
        (status = 400, description = "Invalid title or month", body = ErrorResponse)
    )
)]
pub async fn create_newsletter(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateNewsletterRequest>,
) -> GatewayResult<Json<Newsletter>> {
    Ok(Json(state.newsletter_service.create_newsletter(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/newsletters/{newsletter_id}",
    tag = "Newsletters",
    params(("newsletter_id" = String, Path, description = "Newsletter id")),
    responses(
        (status = 200, description = "Newsletter"),
        (status = 404, description = "Newsletter not found", body = ErrorResponse)
    )
)]
pub async fn get_newsletter(
    State(state): State<Arc<GatewayState>>,
    Path(newsletter_id): Path<String>,
) -> GatewayResult<Json<Newsletter>> {
    Ok(Json(state.newsletter_service.get_newsletter(&newsletter_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/newsletters/{newsletter_id}/upload-pdf",
    tag = "Newsletters",
    params(("newsletter_id" = String, Path, description = "Newsletter id")),
    responses(
        (status = 200, description = "PDF stored"),
        (status = 400, description = "Not a PDF", body = ErrorResponse),
        (status = 404, description = "Newsletter not found", body = ErrorResponse)
    )
)]
pub async fn upload_newsletter_pdf(
    State(state): State<Arc<GatewayState>>,
    Path(newsletter_id): Path<String>,
    mut multipart: Multipart,
) -> GatewayResult<Json<PdfUploadReceipt>> {
    let upload = read_file_field(&mut multipart).await?;
    let receipt = state
        .newsletter_service
        .upload_pdf(&newsletter_id, &upload.file_name, &upload.bytes)
        .await?;
    Ok(Json(receipt))
}

#[utoipa::path(
    get,
    path = "/api/newsletters/{newsletter_id}/pdf",
    tag = "Newsletters",
    params(("newsletter_id" = String, Path, description = "Newsletter id")),
    responses(
        (status = 200, description = "The PDF", content_type = "application/pdf"),
        (status = 404, description = "Newsletter or PDF not found", body = ErrorResponse)
    )
)]
pub async fn download_newsletter_pdf(
    State(state): State<Arc<GatewayState>>,
    Path(newsletter_id): Path<String>,
) -> GatewayResult<Response> {
    let download = state.newsletter_service.pdf(&newsletter_id).await?;
    Ok(attachment(download))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    params(
        ("category" = Option<String>, Query, description = "Category, or `all`"),
        ("search" = Option<String>, Query, description = "Substring of title or description")
    ),
    responses(
        (status = 200, description = "Current documents"),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<DocumentQuery>,
) -> GatewayResult<Json<Vec<Document>>> {
    Ok(Json(state.document_service.list_documents(&query).await?))
}

#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    responses(
        (status = 200, description = "Document created"),
        (status = 400, description = "Invalid document", body = ErrorResponse)
    )
)]
pub async fn create_document(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateDocumentRequest>,
) -> GatewayResult<Json<Document>> {
    Ok(Json(state.document_service.create_document(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/documents/{document_id}",
    tag = "Documents",
    params(("document_id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<GatewayState>>,
    Path(document_id): Path<String>,
) -> GatewayResult<Json<Document>> {
    Ok(Json(state.document_service.get_document(&document_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/documents/{document_id}/upload",
    tag = "Documents",
    params(("document_id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "File stored and linked"),
        (status = 400, description = "Empty or oversized file", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn upload_document_file(
    State(state): State<Arc<GatewayState>>,
    Path(document_id): Path<String>,
    mut multipart: Multipart,
) -> GatewayResult<Json<Document>> {
    let upload = read_file_field(&mut multipart).await?;
    let document = state
        .document_service
        .upload_file(&document_id, &upload.file_name, &upload.bytes)
        .await?;
    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/api/documents/{document_id}/file",
    tag = "Documents",
    params(("document_id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "The document file"),
        (status = 404, description = "Document or file not found", body = ErrorResponse)
    )
)]
pub async fn download_document_file(
    State(state): State<Arc<GatewayState>>,
    Path(document_id): Path<String>,
) -> GatewayResult<Response> {
    let download = state.document_service.file(&document_id).await?;
    Ok(attachment(download))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Contact",
    responses(
        (status = 200, description = "Submission stored"),
        (status = 400, description = "Invalid submission", body = ErrorResponse)
    )
)]
pub async fn submit_contact(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<CreateContactRequest>,
) -> GatewayResult<Json<ContactReceipt>> {
    Ok(Json(state.contact_service.submit(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/contact",
    tag = "Contact",
    responses((status = 200, description = "Submissions, newest first"))
)]
pub async fn list_contact_submissions(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<ContactSubmission>>> {
    Ok(Json(state.contact_service.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    tag = "Contact",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed, or already subscribed"),
        (status = 400, description = "Invalid email", body = ErrorResponse)
    )
)]
pub async fn subscribe(
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<SubscribeRequest>,
) -> GatewayResult<Json<SubscribeReceipt>> {
    Ok(Json(state.subscriber_service.subscribe(&payload.email).await?))
}

#[utoipa::path(
    get,
    path = "/api/newsletter/subscribers",
    tag = "Contact",
    responses((status = 200, description = "Active subscribers"))
)]
pub async fn list_subscribers(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<NewsletterSubscriber>>> {
    Ok(Json(state.subscriber_service.list_active().await?))
}
