pub mod contact_service;
pub mod document_service;
pub mod news_service;
pub mod newsletter_service;
pub mod subscriber_service;

pub use contact_service::ContactService;
pub use document_service::DocumentService;
pub use news_service::NewsService;
pub use newsletter_service::NewsletterService;
pub use subscriber_service::SubscriberService;
