//! Request and response shapes for the shop.

use alumni_database::CartLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::CartTotals;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sizes_available: Vec<String>,
    #[serde(default)]
    pub colors_available: Vec<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub printful_url: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
    pub session_id: String,
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub session_id: String,
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
}

/// Client-supplied names and prices are ignored; the catalog is authoritative.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopCheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    /// Cart to check out when `items` is empty; cleared once the order is recorded.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopCheckoutResponse {
    pub checkout_url: String,
    pub session_id: String,
    pub order_id: String,
    pub totals: CartTotals,
}
