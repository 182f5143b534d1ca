//! Governance documents.

use alumni_database::{non_blank, Document, DocumentCategory, DocumentRepository, NewDocument};
use sqlx::SqlitePool;
use tracing::info;

use crate::storage::{extension, sanitize_file_name, UploadStore};
use crate::types::{
    ContentError, ContentResult, CreateDocumentRequest, DocumentQuery, FileDownload,
};

const DOCUMENT_FOLDER: &str = "documents";

#[derive(Clone)]
pub struct DocumentService {
    documents: DocumentRepository,
    store: UploadStore,
}

impl DocumentService {
    pub fn new(pool: SqlitePool, store: UploadStore) -> Self {
        Self {
            documents: DocumentRepository::new(pool),
            store,
        }
    }

    pub async fn create_document(&self, request: CreateDocumentRequest) -> ContentResult<Document> {
        let title = non_blank(&request.title)
            .ok_or_else(|| ContentError::validation("Title is required"))?;
        let category = request
            .category
            .trim()
            .parse::<DocumentCategory>()
            .map_err(ContentError::validation)?;
        let version = non_blank(&request.version).unwrap_or_else(|| "1.0".to_string());

        let document = self
            .documents
            .create(&NewDocument {
                title,
                description: request.description.trim().to_string(),
                category,
                version,
            })
            .await?;
        Ok(document)
    }

    pub async fn list_documents(&self, query: &DocumentQuery) -> ContentResult<Vec<Document>> {
        let category = match query.category.as_deref().and_then(non_blank) {
            Some(raw) if raw != "all" => {
                Some(raw.parse::<DocumentCategory>().map_err(ContentError::validation)?)
            }
            _ => None,
        };
        let search = query.search.as_deref().and_then(non_blank);
        Ok(self.documents.list(category, search.as_deref()).await?)
    }

    pub async fn get_document(&self, id: &str) -> ContentResult<Document> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| ContentError::not_found("Document", id))
    }

    pub async fn upload_file(
        &self,
        id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> ContentResult<Document> {
        let document = self.get_document(id).await?;
        let file_name = format!("{}_{}", document.id, sanitize_file_name(original_name));
        let stored = self.store.save(DOCUMENT_FOLDER, &file_name, bytes).await?;

        let size = i64::try_from(stored.size)
            .map_err(|_| ContentError::validation("File is too large"))?;
        let document = self
            .documents
            .attach_file(&document.id, &stored.file_name, size)
            .await?;
        info!(document_id = %document.id, file_name = %stored.file_name, size, "document file uploaded");
        Ok(document)
    }

    pub async fn file(&self, id: &str) -> ContentResult<FileDownload> {
        let document = self.get_document(id).await?;
        let file_name = document.file_name.ok_or(ContentError::FileNotFound)?;
        let bytes = self.store.read(DOCUMENT_FOLDER, &file_name).await?;

        let download_name = file_name
            .strip_prefix(&format!("{}_", document.id))
            .unwrap_or(&file_name)
            .to_string();
        Ok(FileDownload {
            content_type: content_type_for(&download_name),
            download_name,
            bytes,
        })
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
