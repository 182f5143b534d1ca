//! Request and response shapes for content endpoints.

use serde::{Deserialize, Serialize};

fn default_author() -> String {
    "ICAA Admin".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNewsPostRequest {
    pub title: String,
    pub content: String,
    /// Derived from the content when omitted.
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default = "default_author")]
    pub author: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl NewsQuery {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn bounds(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        (limit, self.skip.unwrap_or(0).max(0))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNewsletterRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM`
    pub month: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PdfUploadReceipt {
    pub message: String,
    pub pdf_url: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default = "default_version")]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// File bytes plus the name to offer the client.
#[derive(Debug, Clone)]
pub struct FileDownload {
    pub download_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribeReceipt {
    pub message: String,
    /// Absent when the address was already subscribed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
