//! Alumni Database Crate
//!
//! This crate provides database functionality for the alumni association backend,
//! including connection management, migrations, and repository implementations.

use sqlx::SqlitePool;
use alumni_config::DatabaseConfig;

pub mod connection;
pub mod migrations;
pub mod repos;
pub mod entities;
pub mod types;

pub use connection::{DatabaseConnection, prepare_database};
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{
    CartRepository, ChatRepository, ContactRepository, DocumentRepository, EventRepository,
    NewsRepository, NewsletterRepository, OrderRepository, PaymentRepository, ProductRepository,
    SubscriberRepository, UserRepository,
};

// Re-export entities
pub use entities::{
    cart::{CartItem, CartLine, NewCartItem},
    chat::{
        ChatMessage, ChatRoom, ConversationSummary, MessageType, NewChatMessage, NewChatRoom,
        RoomType,
    },
    content::{
        ContactSubmission, Document, DocumentCategory, NewContactSubmission, NewDocument,
        NewNewsPost, NewNewsletter, NewsPost, Newsletter, NewsletterSubscriber,
    },
    event::{
        CancellationOutcome, Event, EventRegistration, EventType, NewEvent, NewRegistration,
        RegistrationOutcome, RegistrationStatus,
    },
    payment::{
        NewPaymentTransaction, NewShopOrder, OrderLine, PaymentTransaction, ShopOrder,
        TransactionStatus,
    },
    product::{NewProduct, Product, ProductCategory},
    user::{MemberPaymentStatus, MembershipTier, NewUser, User, UserFilter, UserUpdate},
};

// Re-export types
pub use types::{errors::DatabaseError, non_blank, normalize_email, DatabaseResult};

/// Re-export commonly used types for convenience
pub use sqlx::Pool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// A migrated database in a throwaway directory; keep the `TempDir` alive.
    pub async fn create_test_database() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 4,
            busy_timeout_ms: 5_000,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }
}
