//! Monthly newsletters and their PDF issues.

use alumni_database::{non_blank, NewNewsletter, Newsletter, NewsletterRepository};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::storage::{extension, UploadStore};
use crate::types::{
    ContentError, ContentResult, CreateNewsletterRequest, FileDownload, PdfUploadReceipt,
};

const PDF_FOLDER: &str = "newsletters";

#[derive(Clone)]
pub struct NewsletterService {
    newsletters: NewsletterRepository,
    store: UploadStore,
}

impl NewsletterService {
    pub fn new(pool: SqlitePool, store: UploadStore) -> Self {
        Self {
            newsletters: NewsletterRepository::new(pool),
            store,
        }
    }

    pub async fn create_newsletter(
        &self,
        request: CreateNewsletterRequest,
    ) -> ContentResult<Newsletter> {
        let title = non_blank(&request.title)
            .ok_or_else(|| ContentError::validation("Title is required"))?;
        let month = request.month.trim();
        if !is_valid_month(month) {
            return Err(ContentError::validation("Month must use the YYYY-MM format"));
        }

        let newsletter = self
            .newsletters
            .create(&NewNewsletter {
                title,
                description: request.description.trim().to_string(),
                month: month.to_string(),
            })
            .await?;
        Ok(newsletter)
    }

    /// Published issues, most recent month first.
    pub async fn list_newsletters(&self) -> ContentResult<Vec<Newsletter>> {
        Ok(self.newsletters.list().await?)
    }

    pub async fn get_newsletter(&self, id: &str) -> ContentResult<Newsletter> {
        self.newsletters
            .find_by_id(id)
            .await?
            .ok_or_else(|| ContentError::not_found("Newsletter", id))
    }

    /// Store a PDF issue; a later upload replaces the link to the earlier one.
    pub async fn upload_pdf(
        &self,
        id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> ContentResult<PdfUploadReceipt> {
        if extension(original_name).as_deref() != Some("pdf") {
            return Err(ContentError::validation("Only PDF files are allowed"));
        }
        let newsletter = self.get_newsletter(id).await?;

        let file_name = format!("{}_{}.pdf", newsletter.id, Utc::now().format("%Y%m%d_%H%M%S"));
        self.store.save(PDF_FOLDER, &file_name, bytes).await?;

        let pdf_url = format!("/api/newsletters/{}/pdf", newsletter.id);
        self.newsletters
            .attach_pdf(&newsletter.id, &file_name, &pdf_url)
            .await?;

        info!(newsletter_id = %newsletter.id, file_name = %file_name, size = bytes.len(), "newsletter pdf uploaded");
        Ok(PdfUploadReceipt {
            message: "PDF uploaded successfully".to_string(),
            pdf_url,
        })
    }

    pub async fn pdf(&self, id: &str) -> ContentResult<FileDownload> {
        let newsletter = self.get_newsletter(id).await?;
        let file_name = newsletter.pdf_filename.ok_or(ContentError::FileNotFound)?;
        let bytes = self.store.read(PDF_FOLDER, &file_name).await?;
        Ok(FileDownload {
            download_name: format!("{}.pdf", newsletter.title),
            content_type: "application/pdf",
            bytes,
        })
    }
}

fn is_valid_month(month: &str) -> bool {
    month.len() == 7 && NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_ok()
}
