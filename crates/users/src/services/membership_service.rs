//! Membership tiers and the hosted checkout handoff for paid tiers.

use std::collections::BTreeMap;
use std::sync::Arc;

use alumni_config::PaymentsConfig;
use alumni_database::{
    normalize_email, non_blank, MembershipTier, NewPaymentTransaction, PaymentRepository,
    TransactionStatus, User,
};
use alumni_payments::{CheckoutLineItem, CheckoutRequest, PaymentProvider};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::services::UserService;
use crate::types::{
    MembershipCheckout, MembershipCheckoutRequest, MembershipStatus, UserError, UserResult,
};

pub struct MembershipService {
    users: UserService,
    payments: PaymentRepository,
    provider: Arc<dyn PaymentProvider>,
    config: PaymentsConfig,
}

impl MembershipService {
    pub fn new(
        pool: SqlitePool,
        provider: Arc<dyn PaymentProvider>,
        config: PaymentsConfig,
    ) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            payments: PaymentRepository::new(pool),
            provider,
            config,
        }
    }

    /// Free tiers activate immediately; paid tiers open a hosted checkout session.
    pub async fn start_checkout(
        &self,
        request: MembershipCheckoutRequest,
    ) -> UserResult<MembershipCheckout> {
        let tier: MembershipTier = request
            .membership_tier
            .parse()
            .map_err(|_| UserError::InvalidMembershipTier)?;
        let user_name = non_blank(&request.user_name)
            .ok_or_else(|| UserError::ValidationFailed("Name is required".to_string()))?;
        let user_email = normalize_email(&request.user_email)
            .ok_or_else(|| UserError::ValidationFailed("Invalid email format".to_string()))?;

        if !tier.is_paid() {
            let member = self.ensure_active_member(&user_name, &user_email, tier).await?;
            return Ok(MembershipCheckout::Activated {
                message: "Free membership created successfully".to_string(),
                member_id: member.id,
            });
        }

        let base = self.config.public_base_url.trim_end_matches('/');
        let mut metadata = BTreeMap::new();
        metadata.insert("membership_tier".to_string(), tier.as_str().to_string());
        metadata.insert("user_email".to_string(), user_email.clone());
        metadata.insert("user_name".to_string(), user_name.clone());

        let session = self
            .provider
            .create_checkout_session(CheckoutRequest {
                line_items: vec![CheckoutLineItem {
                    name: tier.display_name().to_string(),
                    unit_amount_cents: tier.price_cents(),
                    quantity: 1,
                }],
                currency: self.config.currency.clone(),
                success_url: format!("{base}/membership-success?session_id={{CHECKOUT_SESSION_ID}}"),
                cancel_url: format!("{base}/membership"),
                customer_email: Some(user_email.clone()),
                metadata,
            })
            .await?;

        self.payments
            .create(&NewPaymentTransaction {
                session_id: session.session_id.clone(),
                user_email,
                user_name,
                membership_tier: tier,
                amount_cents: tier.price_cents(),
                currency: self.config.currency.clone(),
            })
            .await?;

        info!(session_id = %session.session_id, tier = %tier, "membership checkout started");

        Ok(MembershipCheckout::Checkout {
            checkout_url: session.url,
            session_id: session.session_id,
        })
    }

    /// Poll the provider, record the status, and activate the membership once paid.
    pub async fn checkout_status(&self, session_id: &str) -> UserResult<MembershipStatus> {
        let status = self.provider.checkout_status(session_id).await?;
        let transaction_status = TransactionStatus::from_provider(&status.payment_status);

        match self.payments.find_by_session(session_id).await? {
            Some(transaction) => {
                self.payments
                    .update_status(session_id, transaction_status)
                    .await?;

                if transaction_status == TransactionStatus::Paid {
                    let name = status
                        .metadata
                        .get("user_name")
                        .cloned()
                        .unwrap_or_else(|| transaction.user_name.clone());
                    self.ensure_active_member(
                        &name,
                        &transaction.user_email,
                        transaction.membership_tier,
                    )
                    .await?;
                }
            }
            None => {
                warn!(session_id = %session_id, "checkout status polled for unknown transaction");
            }
        }

        Ok(MembershipStatus {
            status: status.status,
            payment_status: status.payment_status,
            amount_total: status.amount_total_cents,
            currency: status.currency,
        })
    }

    /// Existing members move onto the tier; unknown emails get a new active member record.
    async fn ensure_active_member(
        &self,
        name: &str,
        email: &str,
        tier: MembershipTier,
    ) -> UserResult<User> {
        match self.users.find_by_email(email).await? {
            Some(existing) => self.users.activate_membership(&existing.id, tier).await,
            None => self.users.create_active_member(name, email, tier).await,
        }
    }
}
