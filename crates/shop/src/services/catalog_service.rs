//! Product catalog.

use alumni_database::{non_blank, NewProduct, Product, ProductCategory, ProductRepository};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::pricing::decimal_to_cents;
use crate::types::{CreateProductRequest, ShopError, ShopResult};

/// Highest accepted unit price, 1,000,000.00.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

#[derive(Clone)]
pub struct CatalogService {
    products: ProductRepository,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    pub async fn list_products(&self, category: Option<&str>) -> ShopResult<Vec<Product>> {
        let category = match category.and_then(non_blank) {
            Some(raw) => Some(raw.parse::<ProductCategory>().map_err(ShopError::validation)?),
            None => None,
        };
        Ok(self.products.list(category).await?)
    }

    pub async fn get_product(&self, id: &str) -> ShopResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::ProductNotFound { id: id.to_string() })
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> ShopResult<Product> {
        let name = non_blank(&request.name)
            .ok_or_else(|| ShopError::validation("Product name is required"))?;
        let category = request
            .category
            .parse::<ProductCategory>()
            .map_err(ShopError::validation)?;
        if request.price < Decimal::ZERO {
            return Err(ShopError::validation("Price cannot be negative"));
        }
        let price_cents = decimal_to_cents(request.price)
            .filter(|cents| *cents <= MAX_PRICE_CENTS)
            .ok_or_else(|| ShopError::validation("Price is out of range"))?;
        if request.stock_quantity < 0 {
            return Err(ShopError::validation("Stock quantity cannot be negative"));
        }

        let product = self
            .products
            .create(&NewProduct {
                name,
                description: request.description.trim().to_string(),
                category,
                price_cents,
                image_url: request.image_url.as_deref().and_then(non_blank),
                sizes_available: clean_choices(request.sizes_available),
                colors_available: clean_choices(request.colors_available),
                stock_quantity: request.stock_quantity,
                printful_url: request.printful_url.as_deref().and_then(non_blank),
            })
            .await?;
        Ok(product)
    }
}

fn clean_choices(choices: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(choices.len());
    for choice in choices.iter().filter_map(|choice| non_blank(choice)) {
        if !cleaned.contains(&choice) {
            cleaned.push(choice);
        }
    }
    cleaned
}
