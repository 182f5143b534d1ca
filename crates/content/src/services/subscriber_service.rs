use alumni_database::{normalize_email, NewsletterSubscriber, SubscriberRepository};
use sqlx::SqlitePool;

use crate::types::{ContentError, ContentResult, SubscribeReceipt};

#[derive(Clone)]
pub struct SubscriberService {
    subscribers: SubscriberRepository,
}

impl SubscriberService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            subscribers: SubscriberRepository::new(pool),
        }
    }

    /// Subscribing twice is not an error; the second call reports the existing subscription.
    pub async fn subscribe(&self, email: &str) -> ContentResult<SubscribeReceipt> {
        let email = normalize_email(email)
            .ok_or_else(|| ContentError::validation("Invalid email format"))?;
        let (subscriber, created) = self.subscribers.subscribe(&email).await?;

        if !created {
            return Ok(SubscribeReceipt {
                message: "Already subscribed to newsletter".to_string(),
                id: None,
            });
        }
        Ok(SubscribeReceipt {
            message: "Successfully subscribed to newsletter".to_string(),
            id: Some(subscriber.id),
        })
    }

    pub async fn list_active(&self) -> ContentResult<Vec<NewsletterSubscriber>> {
        Ok(self.subscribers.list_active().await?)
    }
}
