//! Shop order repository

use crate::entities::payment::{NewShopOrder, ShopOrder, TransactionStatus};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::info;

const ORDER_COLUMNS: &str = "id, session_id, customer_name, customer_email, customer_address, \
     items, subtotal_cents, shipping_cents, total_cents, payment_status, created_at";

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, order: &NewShopOrder) -> DatabaseResult<ShopOrder> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO shop_orders (id, session_id, customer_name, customer_email, customer_address, \
             items, subtotal_cents, shipping_cents, total_cents, payment_status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&order.session_id)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_address)
        .bind(Json(&order.items))
        .bind(order.subtotal_cents)
        .bind(order.shipping_cents)
        .bind(order.total_cents)
        .bind(TransactionStatus::Initiated)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(order_id = %id, session_id = %order.session_id, total_cents = order.total_cents, "shop order recorded");

        self.find_by_session(&order.session_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("order", &id))
    }

    pub async fn find_by_session(&self, session_id: &str) -> DatabaseResult<Option<ShopOrder>> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM shop_orders WHERE session_id = ?");
        let order = sqlx::query_as::<_, ShopOrder>(&query)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn list(&self) -> DatabaseResult<Vec<ShopOrder>> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM shop_orders ORDER BY created_at DESC");
        let orders = sqlx::query_as::<_, ShopOrder>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::payment::OrderLine;
    use crate::test_support::create_test_database;

    #[tokio::test]
    async fn order_items_survive_json_storage() {
        let (pool, _dir) = create_test_database().await;
        let repo = OrderRepository::new(pool);

        let order = repo
            .create(&NewShopOrder {
                session_id: "cs_test_1".into(),
                customer_name: "Ada".into(),
                customer_email: "ada@alumni.test".into(),
                customer_address: "1 Main St".into(),
                items: vec![OrderLine {
                    product_id: "p1".into(),
                    product_name: "Alumni Tee".into(),
                    unit_price_cents: 3_000,
                    quantity: 2,
                    size: Some("M".into()),
                    color: None,
                }],
                subtotal_cents: 6_000,
                shipping_cents: 0,
                total_cents: 6_000,
            })
            .await
            .unwrap();

        assert_eq!(order.payment_status, TransactionStatus::Initiated);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
