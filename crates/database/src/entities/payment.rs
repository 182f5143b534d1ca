//! Payment transaction and shop order entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use std::fmt;

use super::user::MembershipTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Initiated,
    Paid,
    Unpaid,
    Failed,
    Expired,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Initiated => "initiated",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Unpaid => "unpaid",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Expired => "expired",
        }
    }

    /// Provider statuses are mapped loosely; anything unrecognised stays unpaid.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "paid" | "no_payment_required" => TransactionStatus::Paid,
            "expired" => TransactionStatus::Expired,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Unpaid,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Paid | TransactionStatus::Failed | TransactionStatus::Expired
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentTransaction {
    pub id: String,
    pub session_id: String,
    pub user_email: String,
    pub user_name: String,
    pub membership_tier: MembershipTier,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentTransaction {
    pub session_id: String,
    pub user_email: String,
    pub user_name: String,
    pub membership_tier: MembershipTier,
    pub amount_cents: i64,
    pub currency: String,
}

/// A priced line captured at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopOrder {
    pub id: String,
    pub session_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<OrderLine>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub payment_status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for ShopOrder {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let items: Json<Vec<OrderLine>> = row.try_get("items")?;
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            customer_address: row.try_get("customer_address")?,
            items: items.0,
            subtotal_cents: row.try_get("subtotal_cents")?,
            shipping_cents: row.try_get("shipping_cents")?,
            total_cents: row.try_get("total_cents")?,
            payment_status: row.try_get("payment_status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewShopOrder {
    pub session_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<OrderLine>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
}
