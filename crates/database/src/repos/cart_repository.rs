//! Session-scoped cart repository

use crate::entities::cart::{CartItem, CartLine, NewCartItem};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add to the cart, merging into an existing line with the same product and variant.
    /// A merge that would push the line above `max_quantity` fails with `Conflict`.
    pub async fn add(&self, item: &NewCartItem, max_quantity: i64) -> DatabaseResult<CartItem> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT quantity FROM cart_items \
             WHERE session_id = ? AND product_id = ? AND size IS ? AND color IS ?",
        )
        .bind(&item.session_id)
        .bind(&item.product_id)
        .bind(&item.size)
        .bind(&item.color)
        .fetch_optional(&mut *tx)
        .await?;

        let merged = existing.is_some();
        if merged {
            let updated = sqlx::query(
                "UPDATE cart_items SET quantity = quantity + ? \
                 WHERE session_id = ? AND product_id = ? AND size IS ? AND color IS ? \
                 AND quantity + ? <= ?",
            )
            .bind(item.quantity)
            .bind(&item.session_id)
            .bind(&item.product_id)
            .bind(&item.size)
            .bind(&item.color)
            .bind(item.quantity)
            .bind(max_quantity)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                return Err(DatabaseError::Conflict(format!(
                    "cart line for product {} would exceed {max_quantity} units",
                    item.product_id
                )));
            }
        } else {
            sqlx::query(
                "INSERT INTO cart_items (id, session_id, product_id, quantity, size, color, added_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&item.session_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(&item.size)
            .bind(&item.color)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        let stored = sqlx::query_as::<_, CartItem>(
            "SELECT id, session_id, product_id, quantity, size, color, added_at FROM cart_items \
             WHERE session_id = ? AND product_id = ? AND size IS ? AND color IS ?",
        )
        .bind(&item.session_id)
        .bind(&item.product_id)
        .bind(&item.size)
        .bind(&item.color)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(session_id = %item.session_id, product_id = %item.product_id, merged, "cart item stored");
        Ok(stored)
    }

    /// Cart lines joined with current catalog data, oldest first.
    pub async fn lines(&self, session_id: &str) -> DatabaseResult<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT c.id, c.session_id, c.product_id, p.name AS product_name, \
             p.price_cents AS product_price_cents, p.image_url, c.quantity, c.size, c.color, c.added_at \
             FROM cart_items c JOIN products p ON p.id = c.product_id \
             WHERE c.session_id = ? ORDER BY c.added_at ASC, c.rowid ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    pub async fn remove(&self, session_id: &str, item_id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND session_id = ?")
            .bind(item_id)
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("cart item", item_id));
        }
        Ok(())
    }

    /// Returns the number of removed lines.
    pub async fn clear(&self, session_id: &str) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        info!(session_id = %session_id, removed = result.rows_affected(), "cart cleared");
        Ok(result.rows_affected())
    }
}
