//! # Alumni Payments Crate
//!
//! Hosted-checkout handoff. Callers describe what is being bought, a
//! [`PaymentProvider`] opens a checkout session on the provider's hosted page
//! and later reports its status when polled. Webhooks are not handled here.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod stripe;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use stripe::StripeCheckout;

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payments are not configured")]
    NotConfigured,
    #[error("invalid checkout request: {0}")]
    InvalidRequest(String),
    #[error("checkout session {0} not found")]
    SessionNotFound(String),
    #[error("payment provider rejected the request ({status}): {message}")]
    Provider { status: u16, message: String },
    #[error("payment provider http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid payment provider response: {0}")]
    Response(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub name: String,
    pub unit_amount_cents: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub line_items: Vec<CheckoutLineItem>,
    pub currency: String,
    /// May contain the `{CHECKOUT_SESSION_ID}` placeholder, which the provider fills in.
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutRequest {
    /// `None` when the amount does not fit in cents.
    pub fn total_cents(&self) -> Option<i64> {
        self.line_items.iter().try_fold(0_i64, |sum, item| {
            item.unit_amount_cents
                .checked_mul(item.quantity)
                .and_then(|line| sum.checked_add(line))
        })
    }

    pub fn validate(&self) -> PaymentResult<()> {
        if self.line_items.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "at least one line item is required".into(),
            ));
        }
        if self
            .line_items
            .iter()
            .any(|item| item.quantity < 1 || item.unit_amount_cents < 0)
        {
            return Err(PaymentError::InvalidRequest(
                "line items need a positive quantity and a non-negative amount".into(),
            ));
        }
        if self.total_cents().is_none() {
            return Err(PaymentError::InvalidRequest(
                "checkout total is out of range".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutStatus {
    pub session_id: String,
    /// Session lifecycle: `open`, `complete` or `expired`.
    pub status: String,
    /// Payment state: `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,
    pub amount_total_cents: Option<i64>,
    pub currency: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self.payment_status.as_str(), "paid" | "no_payment_required")
    }
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> PaymentResult<CheckoutSession>;

    async fn checkout_status(&self, session_id: &str) -> PaymentResult<CheckoutStatus>;
}

/// Stands in when no provider credentials are configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

#[async_trait]
impl PaymentProvider for DisabledProvider {
    async fn create_checkout_session(
        &self,
        _request: CheckoutRequest,
    ) -> PaymentResult<CheckoutSession> {
        Err(PaymentError::NotConfigured)
    }

    async fn checkout_status(&self, _session_id: &str) -> PaymentResult<CheckoutStatus> {
        Err(PaymentError::NotConfigured)
    }
}
