//! Database repository implementations

pub mod cart_repository;
pub mod chat_repository;
pub mod contact_repository;
pub mod document_repository;
pub mod event_repository;
pub mod news_repository;
pub mod newsletter_repository;
pub mod order_repository;
pub mod payment_repository;
pub mod product_repository;
pub mod subscriber_repository;
pub mod user_repository;

pub use cart_repository::CartRepository;
pub use chat_repository::ChatRepository;
pub use contact_repository::ContactRepository;
pub use document_repository::DocumentRepository;
pub use event_repository::EventRepository;
pub use news_repository::NewsRepository;
pub use newsletter_repository::NewsletterRepository;
pub use order_repository::OrderRepository;
pub use payment_repository::PaymentRepository;
pub use product_repository::ProductRepository;
pub use subscriber_repository::SubscriberRepository;
pub use user_repository::UserRepository;
