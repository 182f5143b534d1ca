//! Shopping cart entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: String,
    pub session_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// A cart item joined with the product's current name and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: String,
    pub session_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_price_cents: i64,
    pub image_url: Option<String>,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total_cents(&self) -> i64 {
        self.product_price_cents.saturating_mul(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub session_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}
