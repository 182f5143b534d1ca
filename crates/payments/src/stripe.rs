//! Stripe Checkout client over the REST API.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use alumni_config::PaymentsConfig;

use crate::{
    CheckoutRequest, CheckoutSession, CheckoutStatus, PaymentError, PaymentProvider,
    PaymentResult,
};

#[derive(Clone)]
pub struct StripeCheckout {
    client: Client,
    api_key: String,
    api_base: String,
}

impl StripeCheckout {
    pub fn new(config: &PaymentsConfig) -> PaymentResult<Self> {
        let api_key = config
            .stripe_api_key
            .clone()
            .ok_or(PaymentError::NotConfigured)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }
}

/// Stripe's bracketed form encoding of a checkout request.
fn form_params(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];
    if let Some(email) = &request.customer_email {
        params.push(("customer_email".to_string(), email.clone()));
    }
    for (index, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{index}]");
        params.push((
            format!("{prefix}[price_data][currency]"),
            request.currency.clone(),
        ));
        params.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        params.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount_cents.to_string(),
        ));
        params.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }
    for (key, value) in &request.metadata {
        params.push((format!("metadata[{key}]"), value.clone()));
    }
    params
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    status: Option<String>,
    payment_status: Option<String>,
    amount_total: Option<i64>,
    currency: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

async fn provider_error(response: Response) -> PaymentError {
    let status = response.status().as_u16();
    let message = match response.json::<StripeErrorBody>().await {
        Ok(body) => body
            .error
            .message
            .unwrap_or_else(|| "unknown error".to_string()),
        Err(_) => "unreadable error body".to_string(),
    };
    warn!(status, message = %message, "stripe request rejected");
    PaymentError::Provider { status, message }
}

#[async_trait]
impl PaymentProvider for StripeCheckout {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> PaymentResult<CheckoutSession> {
        request.validate()?;

        let response = self
            .client
            .post(self.sessions_url())
            .bearer_auth(&self.api_key)
            .form(&form_params(&request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let session: StripeSession = serde_json::from_str(&response.text().await?)?;
        let url = session.url.ok_or_else(|| PaymentError::Provider {
            status: 200,
            message: "checkout session has no url".to_string(),
        })?;

        info!(session_id = %session.id, total_cents = ?request.total_cents(), "checkout session created");
        Ok(CheckoutSession {
            session_id: session.id,
            url,
        })
    }

    async fn checkout_status(&self, session_id: &str) -> PaymentResult<CheckoutStatus> {
        let response = self
            .client
            .get(format!("{}/{}", self.sessions_url(), session_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PaymentError::SessionNotFound(session_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let session: StripeSession = serde_json::from_str(&response.text().await?)?;
        debug!(session_id = %session.id, payment_status = ?session.payment_status, "checkout status fetched");

        Ok(CheckoutStatus {
            session_id: session.id,
            status: session.status.unwrap_or_else(|| "open".to_string()),
            payment_status: session
                .payment_status
                .unwrap_or_else(|| "unpaid".to_string()),
            amount_total_cents: session.amount_total,
            currency: session.currency,
            metadata: session.metadata,
        })
    }
}
