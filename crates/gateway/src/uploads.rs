//! Multipart upload helpers shared by the REST handlers.

use alumni_content::{storage::extension, StoredFile, UploadStore};
use axum::{body::Bytes, extract::Multipart};
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// Multipart field every upload form uses.
pub const FILE_FIELD: &str = "file";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Read the `file` field, skipping any other fields in the form.
pub async fn read_file_field(multipart: &mut Multipart) -> GatewayResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        debug!(file_name = %file_name, size = bytes.len(), "multipart file received");
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(GatewayError::InvalidRequest(format!(
        "Missing '{FILE_FIELD}' field in upload"
    )))
}

/// Image extension of an upload, or `None` when it is not an accepted image.
pub fn image_extension(upload: &UploadedFile) -> Option<String> {
    let declared_image = upload
        .content_type
        .as_deref()
        .map_or(true, |content_type| content_type.starts_with("image/"));

    extension(&upload.file_name)
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .filter(|_| declared_image)
}

/// Store an image under a fresh collision-free name.
pub async fn store_image(
    store: &UploadStore,
    folder: &str,
    upload: &UploadedFile,
) -> GatewayResult<StoredFile> {
    let ext = image_extension(upload)
        .ok_or_else(|| GatewayError::InvalidRequest("Only image files are allowed".to_string()))?;
    let file_name = format!("{}.{ext}", cuid2::create_id());
    Ok(store.save(folder, &file_name, &upload.bytes).await?)
}
