//! Shop catalog entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub sizes_available: Vec<String>,
    pub colors_available: Vec<String>,
    pub stock_quantity: i64,
    pub printful_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// A variant value is acceptable when the product offers no choices for it,
    /// or when it names one of the offered choices.
    pub fn offers_size(&self, size: Option<&str>) -> bool {
        offers(&self.sizes_available, size)
    }

    pub fn offers_color(&self, color: Option<&str>) -> bool {
        offers(&self.colors_available, color)
    }
}

fn offers(choices: &[String], wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(value) => choices.is_empty() || choices.iter().any(|choice| choice == value),
    }
}

impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let sizes: Json<Vec<String>> = row.try_get("sizes_available")?;
        let colors: Json<Vec<String>> = row.try_get("colors_available")?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            price_cents: row.try_get("price_cents")?,
            image_url: row.try_get("image_url")?,
            sizes_available: sizes.0,
            colors_available: colors.0,
            stock_quantity: row.try_get("stock_quantity")?,
            printful_url: row.try_get("printful_url")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub sizes_available: Vec<String>,
    pub colors_available: Vec<String>,
    pub stock_quantity: i64,
    pub printful_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Apparel,
    Accessories,
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Apparel => "apparel",
            ProductCategory::Accessories => "accessories",
            ProductCategory::Other => "other",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apparel" => Ok(ProductCategory::Apparel),
            "accessories" => Ok(ProductCategory::Accessories),
            "other" => Ok(ProductCategory::Other),
            unknown => Err(format!("unknown product category '{unknown}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tee() -> Product {
        Product {
            id: "p1".into(),
            name: "Alumni Tee".into(),
            description: "Soft cotton tee".into(),
            category: ProductCategory::Apparel,
            price_cents: 2_500,
            image_url: None,
            sizes_available: vec!["S".into(), "M".into()],
            colors_available: vec![],
            stock_quantity: 10,
            printful_url: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn variants_are_checked_against_offered_choices() {
        let product = tee();
        assert!(product.offers_size(Some("M")));
        assert!(!product.offers_size(Some("XXL")));
        assert!(product.offers_size(None));
        // No colour choices means any colour label is accepted.
        assert!(product.offers_color(Some("Navy")));
    }
}
