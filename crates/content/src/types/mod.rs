pub mod errors;
pub mod requests;

pub use errors::{ContentError, ContentResult};
pub use requests::{
    ContactReceipt, CreateContactRequest, CreateDocumentRequest, CreateNewsPostRequest,
    CreateNewsletterRequest, DocumentQuery, FileDownload, NewsQuery, PdfUploadReceipt,
    SubscribeReceipt,
};
