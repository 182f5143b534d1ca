//! News post repository

use crate::entities::content::{NewNewsPost, NewsPost};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

const NEWS_COLUMNS: &str = "id, title, content, excerpt, author, published_date, is_published";

#[derive(Clone)]
pub struct NewsRepository {
    pool: SqlitePool,
}

impl NewsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, post: &NewNewsPost) -> DatabaseResult<NewsPost> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO news_posts (id, title, content, excerpt, author, published_date, is_published) \
             VALUES (?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.author)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(post_id = %id, title = %post.title, "news post published");

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("news post", &id))
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<NewsPost>> {
        let query = format!("SELECT {NEWS_COLUMNS} FROM news_posts WHERE id = ? AND is_published = 1");
        let post = sqlx::query_as::<_, NewsPost>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    /// Published posts, newest first.
    pub async fn list(&self, limit: i64, skip: i64) -> DatabaseResult<Vec<NewsPost>> {
        let query = format!(
            "SELECT {NEWS_COLUMNS} FROM news_posts WHERE is_published = 1 \
             ORDER BY published_date DESC, rowid DESC LIMIT ? OFFSET ?"
        );
        let posts = sqlx::query_as::<_, NewsPost>(&query)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;

    #[tokio::test]
    async fn newest_posts_come_first() {
        let (pool, _dir) = create_test_database().await;
        let repo = NewsRepository::new(pool);

        for title in ["Spring gala recap", "Board election results"] {
            repo.create(&NewNewsPost {
                title: title.into(),
                content: "Full story".into(),
                excerpt: "Short".into(),
                author: "ICAA Board".into(),
            })
            .await
            .unwrap();
        }

        let posts = repo.list(10, 0).await.unwrap();
        assert_eq!(posts[0].title, "Board election results");
        assert_eq!(repo.list(10, 1).await.unwrap().len(), 1);
    }
}
