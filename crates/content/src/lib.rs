//! # Alumni Content Crate
//!
//! Editorial content for the association site:
//!
//! - **NewsService**: posts, newest first
//! - **NewsletterService**: monthly issues with an attached PDF
//! - **DocumentService**: governance documents with an attached file
//! - **ContactService** and **SubscriberService**: inbound forms
//!
//! Uploaded files are written through [`UploadStore`], a local directory.

pub mod services;
pub mod storage;
pub mod types;

pub use services::{
    ContactService, DocumentService, NewsService, NewsletterService, SubscriberService,
};
pub use storage::{StoredFile, UploadStore};
pub use types::{
    ContactReceipt, ContentError, ContentResult, CreateContactRequest, CreateDocumentRequest,
    CreateNewsPostRequest, CreateNewsletterRequest, DocumentQuery, FileDownload, NewsQuery,
    PdfUploadReceipt, SubscribeReceipt,
};
