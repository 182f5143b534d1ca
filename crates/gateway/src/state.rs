//! Shared application state for the gateway

use std::sync::Arc;

use alumni_chats::{ChatHub, ChatService};
use alumni_config::AppConfig;
use alumni_content::{
    ContactService, DocumentService, NewsService, NewsletterService, SubscriberService,
    UploadStore,
};
use alumni_events::EventService;
use alumni_payments::PaymentProvider;
use alumni_shop::{CartService, CatalogService, CheckoutService};
use alumni_users::{MembershipService, UserService};
use sqlx::SqlitePool;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    /// Owns the admission lock, so every request must share one instance.
    pub event_service: Arc<EventService>,
    pub user_service: Arc<UserService>,
    pub membership_service: Arc<MembershipService>,
    pub catalog_service: Arc<CatalogService>,
    pub cart_service: Arc<CartService>,
    pub checkout_service: Arc<CheckoutService>,
    pub news_service: Arc<NewsService>,
    pub newsletter_service: Arc<NewsletterService>,
    pub document_service: Arc<DocumentService>,
    pub contact_service: Arc<ContactService>,
    pub subscriber_service: Arc<SubscriberService>,
    pub chat_service: ChatService,
    /// Realtime channels and presence for every open chat socket.
    pub chat_hub: Arc<ChatHub>,
    pub uploads: UploadStore,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, config: AppConfig, provider: Arc<dyn PaymentProvider>) -> Self {
        let uploads = UploadStore::new(&config.uploads);

        Self {
            event_service: Arc::new(EventService::new(pool.clone())),
            user_service: Arc::new(UserService::new(pool.clone())),
            membership_service: Arc::new(MembershipService::new(
                pool.clone(),
                Arc::clone(&provider),
                config.payments.clone(),
            )),
            catalog_service: Arc::new(CatalogService::new(pool.clone())),
            cart_service: Arc::new(CartService::new(pool.clone(), config.shop.clone())),
            checkout_service: Arc::new(CheckoutService::new(
                pool.clone(),
                provider,
                config.payments.clone(),
                config.shop.clone(),
            )),
            news_service: Arc::new(NewsService::new(pool.clone())),
            newsletter_service: Arc::new(NewsletterService::new(pool.clone(), uploads.clone())),
            document_service: Arc::new(DocumentService::new(pool.clone(), uploads.clone())),
            contact_service: Arc::new(ContactService::new(pool.clone())),
            subscriber_service: Arc::new(SubscriberService::new(pool.clone())),
            chat_service: ChatService::new(pool.clone(), config.chat.clone()),
            chat_hub: Arc::new(ChatHub::new(config.chat.channel_capacity)),
            uploads,
            config: Arc::new(config),
            pool,
        }
    }
}
