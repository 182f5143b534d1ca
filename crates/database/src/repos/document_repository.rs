//! Governance document repository

use crate::entities::content::{Document, DocumentCategory, NewDocument};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

const DOCUMENT_COLUMNS: &str =
    "id, title, description, category, version, is_current_version, file_name, file_size, uploaded_at";

#[derive(Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, document: &NewDocument) -> DatabaseResult<Document> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO documents (id, title, description, category, version, is_current_version, uploaded_at) \
             VALUES (?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(&id)
        .bind(&document.title)
        .bind(&document.description)
        .bind(document.category)
        .bind(&document.version)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(document_id = %id, category = %document.category, "document created");

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("document", &id))
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Document>> {
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?");
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    pub async fn list(
        &self,
        category: Option<DocumentCategory>,
        search: Option<&str>,
    ) -> DatabaseResult<Vec<Document>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE is_current_version = 1"
        ));
        if let Some(category) = category {
            builder.push(" AND category = ").push_bind(category);
        }
        if let Some(search) = search {
            let pattern = format!("%{}%", search.to_lowercase());
            builder
                .push(" AND (lower(title) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR lower(description) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY category ASC, title ASC");

        let documents = builder
            .build_query_as::<Document>()
            .fetch_all(&self.pool)
            .await?;
        Ok(documents)
    }

    pub async fn attach_file(
        &self,
        id: &str,
        file_name: &str,
        file_size: i64,
    ) -> DatabaseResult<Document> {
        let result = sqlx::query("UPDATE documents SET file_name = ?, file_size = ? WHERE id = ?")
            .bind(file_name)
            .bind(file_size)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("document", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("document", id))
    }
}
