//! Newsletter subscriber repository

use crate::entities::content::NewsletterSubscriber;
use crate::types::DatabaseResult;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct SubscriberRepository {
    pool: SqlitePool,
}

impl SubscriberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe an address. Returns `(subscriber, created)`; existing rows are
    /// reactivated rather than duplicated.
    pub async fn subscribe(&self, email: &str) -> DatabaseResult<(NewsletterSubscriber, bool)> {
        let inserted = sqlx::query(
            "INSERT INTO newsletter_subscribers (id, email, subscribed_at, is_active) \
             VALUES (?, ?, ?, 1) ON CONFLICT(email) DO NOTHING",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected()
            == 1;

        if !inserted {
            sqlx::query("UPDATE newsletter_subscribers SET is_active = 1 WHERE email = ?")
                .bind(email)
                .execute(&self.pool)
                .await?;
        } else {
            info!(email = %email, "newsletter subscriber added");
        }

        let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
            "SELECT id, email, subscribed_at, is_active FROM newsletter_subscribers WHERE email = ?",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok((subscriber, inserted))
    }

    pub async fn list_active(&self) -> DatabaseResult<Vec<NewsletterSubscriber>> {
        let subscribers = sqlx::query_as::<_, NewsletterSubscriber>(
            "SELECT id, email, subscribed_at, is_active FROM newsletter_subscribers \
             WHERE is_active = 1 ORDER BY subscribed_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;

    #[tokio::test]
    async fn subscribing_twice_is_idempotent() {
        let (pool, _dir) = create_test_database().await;
        let repo = SubscriberRepository::new(pool);

        let (first, created) = repo.subscribe("ada@alumni.test").await.unwrap();
        assert!(created);
        let (second, created) = repo.subscribe("ada@alumni.test").await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(repo.list_active().await.unwrap().len(), 1);
    }
}
