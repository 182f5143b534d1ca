//! Product catalog repository

use crate::entities::product::{NewProduct, Product, ProductCategory};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::info;

const PRODUCT_COLUMNS: &str = "id, name, description, category, price_cents, image_url, \
     sizes_available, colors_available, stock_quantity, printful_url, is_active, created_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &NewProduct) -> DatabaseResult<Product> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO products (id, name, description, category, price_cents, image_url, \
             sizes_available, colors_available, stock_quantity, printful_url, is_active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(&id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category)
        .bind(product.price_cents)
        .bind(&product.image_url)
        .bind(Json(&product.sizes_available))
        .bind(Json(&product.colors_available))
        .bind(product.stock_quantity)
        .bind(&product.printful_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(product_id = %id, name = %product.name, "product created");

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("product", &id))
    }

    /// Active products only.
    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<Product>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND is_active = 1");
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list(&self, category: Option<ProductCategory>) -> DatabaseResult<Vec<Product>> {
        let products = match category {
            Some(category) => {
                let query = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 AND category = ? \
                     ORDER BY name ASC"
                );
                sqlx::query_as::<_, Product>(&query)
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name ASC"
                );
                sqlx::query_as::<_, Product>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;

    fn hoodie() -> NewProduct {
        NewProduct {
            name: "Alumni Hoodie".into(),
            description: "Heavyweight fleece".into(),
            category: ProductCategory::Apparel,
            price_cents: 4_500,
            image_url: None,
            sizes_available: vec!["S".into(), "M".into(), "L".into()],
            colors_available: vec!["Navy".into()],
            stock_quantity: 25,
            printful_url: Some("https://printful.test/hoodie".into()),
        }
    }

    #[tokio::test]
    async fn create_and_filter_by_category() {
        let (pool, _dir) = create_test_database().await;
        let repo = ProductRepository::new(pool);

        let hoodie = repo.create(&hoodie()).await.unwrap();
        assert_eq!(hoodie.sizes_available.len(), 3);

        let mut mug = self::hoodie();
        mug.name = "Coffee Mug".into();
        mug.category = ProductCategory::Accessories;
        mug.sizes_available.clear();
        repo.create(&mug).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        let apparel = repo.list(Some(ProductCategory::Apparel)).await.unwrap();
        assert_eq!(apparel.len(), 1);
        assert_eq!(apparel[0].id, hoodie.id);
    }
}
