//! In-memory provider for exercising checkout flows without network access.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{CheckoutRequest, CheckoutSession, CheckoutStatus, PaymentError, PaymentProvider, PaymentResult};

/// Records every checkout request and answers status polls from a settable table.
#[derive(Default)]
pub struct RecordingProvider {
    requests: Mutex<Vec<CheckoutRequest>>,
    statuses: Mutex<HashMap<String, String>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payment status reported for a session.
    pub fn set_payment_status(&self, session_id: &str, payment_status: &str) {
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.insert(session_id.to_string(), payment_status.to_string());
        }
    }

    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentProvider for RecordingProvider {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> PaymentResult<CheckoutSession> {
        request.validate()?;
        let mut requests = self
            .requests
            .lock()
            .map_err(|_| PaymentError::InvalidRequest("recorder poisoned".into()))?;
        let session_id = format!("cs_test_{}", requests.len() + 1);
        requests.push(request);
        drop(requests);

        self.set_payment_status(&session_id, "unpaid");
        Ok(CheckoutSession {
            url: format!("https://checkout.test/pay/{session_id}"),
            session_id,
        })
    }

    async fn checkout_status(&self, session_id: &str) -> PaymentResult<CheckoutStatus> {
        let payment_status = self
            .statuses
            .lock()
            .ok()
            .and_then(|statuses| statuses.get(session_id).cloned())
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))?;

        let request = self.requests().into_iter().enumerate().find_map(|(index, request)| {
            (format!("cs_test_{}", index + 1) == session_id).then_some(request)
        });

        Ok(CheckoutStatus {
            session_id: session_id.to_string(),
            status: if payment_status == "paid" { "complete" } else { "open" }.to_string(),
            amount_total_cents: request.as_ref().and_then(CheckoutRequest::total_cents),
            currency: request.as_ref().map(|r| r.currency.clone()),
            metadata: request.map(|r| r.metadata).unwrap_or_default(),
            payment_status,
        })
    }
}
