//! Monthly newsletter repository

use crate::entities::content::{NewNewsletter, Newsletter};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

const NEWSLETTER_COLUMNS: &str =
    "id, title, description, month, pdf_filename, pdf_url, uploaded_at, updated_at, is_published";

#[derive(Clone)]
pub struct NewsletterRepository {
    pool: SqlitePool,
}

impl NewsletterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, newsletter: &NewNewsletter) -> DatabaseResult<Newsletter> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO newsletters (id, title, description, month, uploaded_at, is_published) \
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(&id)
        .bind(&newsletter.title)
        .bind(&newsletter.description)
        .bind(&newsletter.month)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(newsletter_id = %id, month = %newsletter.month, "newsletter created");

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("newsletter", &id))
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Newsletter>> {
        let query = format!("SELECT {NEWSLETTER_COLUMNS} FROM newsletters WHERE id = ?");
        let newsletter = sqlx::query_as::<_, Newsletter>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(newsletter)
    }

    /// Published newsletters, latest month first.
    pub async fn list(&self) -> DatabaseResult<Vec<Newsletter>> {
        let query = format!(
            "SELECT {NEWSLETTER_COLUMNS} FROM newsletters WHERE is_published = 1 \
             ORDER BY month DESC, uploaded_at DESC"
        );
        let newsletters = sqlx::query_as::<_, Newsletter>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(newsletters)
    }

    pub async fn attach_pdf(
        &self,
        id: &str,
        pdf_filename: &str,
        pdf_url: &str,
    ) -> DatabaseResult<Newsletter> {
        let result = sqlx::query(
            "UPDATE newsletters SET pdf_filename = ?, pdf_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(pdf_filename)
        .bind(pdf_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("newsletter", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("newsletter", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;

    #[tokio::test]
    async fn pdf_attachment_is_recorded() {
        let (pool, _dir) = create_test_database().await;
        let repo = NewsletterRepository::new(pool);

        let older = repo
            .create(&NewNewsletter {
                title: "January".into(),
                description: "New year".into(),
                month: "2026-01".into(),
            })
            .await
            .unwrap();
        let newer = repo
            .create(&NewNewsletter {
                title: "March".into(),
                description: "Spring".into(),
                month: "2026-03".into(),
            })
            .await
            .unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].id, newer.id);

        let updated = repo
            .attach_pdf(&older.id, "jan.pdf", "/api/newsletters/x/pdf")
            .await
            .unwrap();
        assert_eq!(updated.pdf_filename.as_deref(), Some("jan.pdf"));
        assert!(updated.updated_at.is_some());

        assert!(repo.attach_pdf("missing", "a.pdf", "/x").await.is_err());
    }
}
