//! Contact form submissions

use crate::entities::content::{ContactSubmission, NewContactSubmission};
use crate::types::DatabaseResult;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, submission: &NewContactSubmission) -> DatabaseResult<ContactSubmission> {
        let id = uuid::Uuid::new_v4().to_string();

        let stored = sqlx::query_as::<_, ContactSubmission>(
            "INSERT INTO contact_submissions (id, name, email, subject, message, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id, name, email, subject, message, created_at",
        )
        .bind(&id)
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.subject)
        .bind(&submission.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(submission_id = %id, subject = %submission.subject, "contact submission received");
        Ok(stored)
    }

    pub async fn list(&self) -> DatabaseResult<Vec<ContactSubmission>> {
        let submissions = sqlx::query_as::<_, ContactSubmission>(
            "SELECT id, name, email, subject, message, created_at FROM contact_submissions \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }
}
