//! News, newsletter, document and contact entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NewsPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub published_date: DateTime<Utc>,
    pub is_published: bool,
}

#[derive(Debug, Clone)]
pub struct NewNewsPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Newsletter {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM`
    pub month: String,
    pub pdf_filename: Option<String>,
    pub pdf_url: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_published: bool,
}

#[derive(Debug, Clone)]
pub struct NewNewsletter {
    pub title: String,
    pub description: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: DocumentCategory,
    pub version: String,
    pub is_current_version: bool,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub category: DocumentCategory,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Bylaws,
    Policies,
    Forms,
    Reports,
    Other,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Bylaws => "bylaws",
            DocumentCategory::Policies => "policies",
            DocumentCategory::Forms => "forms",
            DocumentCategory::Reports => "reports",
            DocumentCategory::Other => "other",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bylaws" => Ok(DocumentCategory::Bylaws),
            "policies" => Ok(DocumentCategory::Policies),
            "forms" => Ok(DocumentCategory::Forms),
            "reports" => Ok(DocumentCategory::Reports),
            "other" => Ok(DocumentCategory::Other),
            unknown => Err(format!("unknown document category '{unknown}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NewsletterSubscriber {
    pub id: String,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}
