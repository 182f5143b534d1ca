//! Membership tier selection and checkout polling against a recording provider.

use std::sync::Arc;

use alumni_config::{DatabaseConfig, PaymentsConfig};
use alumni_database::{initialize_database, MemberPaymentStatus, MembershipTier};
use alumni_payments::test_support::RecordingProvider;
use alumni_users::{
    MembershipCheckout, MembershipCheckoutRequest, MembershipService, UserError, UserService,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("users.db").display()),
        max_connections: 4,
        busy_timeout_ms: 5_000,
    };
    (initialize_database(&config).await.unwrap(), temp_dir)
}

fn request(tier: &str) -> MembershipCheckoutRequest {
    MembershipCheckoutRequest {
        membership_tier: tier.to_string(),
        user_email: "Ada@Alumni.Test".to_string(),
        user_name: "Ada".to_string(),
    }
}

#[tokio::test]
async fn free_tier_creates_active_member_without_checkout() {
    let (pool, _dir) = create_test_pool().await;
    let provider = Arc::new(RecordingProvider::new());
    let service = MembershipService::new(pool.clone(), provider.clone(), PaymentsConfig::default());

    let outcome = service.start_checkout(request("free")).await.unwrap();
    let MembershipCheckout::Activated { member_id, message } = outcome else {
        panic!("free tier should not redirect to checkout");
    };
    assert_eq!(message, "Free membership created successfully");
    assert!(provider.requests().is_empty());

    let member = UserService::new(pool).get_user(&member_id).await.unwrap();
    assert_eq!(member.email, "ada@alumni.test");
    assert_eq!(member.payment_status, MemberPaymentStatus::Active);
}

#[tokio::test]
async fn paid_tier_hands_off_to_hosted_checkout() {
    let (pool, _dir) = create_test_pool().await;
    let provider = Arc::new(RecordingProvider::new());
    let config = PaymentsConfig {
        public_base_url: "https://icaa.test/".to_string(),
        ..PaymentsConfig::default()
    };
    let service = MembershipService::new(pool, provider.clone(), config);

    let outcome = service.start_checkout(request("lifetime")).await.unwrap();
    let MembershipCheckout::Checkout { checkout_url, session_id } = outcome else {
        panic!("paid tier should redirect to checkout");
    };
    assert!(checkout_url.contains(&session_id));

    let sent = provider.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].total_cents(), Some(120_000));
    assert_eq!(
        sent[0].success_url,
        "https://icaa.test/membership-success?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(sent[0].cancel_url, "https://icaa.test/membership");
}

#[tokio::test]
async fn paid_status_activates_membership_once() {
    let (pool, _dir) = create_test_pool().await;
    let provider = Arc::new(RecordingProvider::new());
    let service = MembershipService::new(pool.clone(), provider.clone(), PaymentsConfig::default());

    let MembershipCheckout::Checkout { session_id, .. } =
        service.start_checkout(request("active_yearly")).await.unwrap()
    else {
        panic!("expected checkout");
    };

    let pending = service.checkout_status(&session_id).await.unwrap();
    assert_eq!(pending.payment_status, "unpaid");
    let users = UserService::new(pool);
    assert!(users.find_by_email("ada@alumni.test").await.unwrap().is_none());

    provider.set_payment_status(&session_id, "paid");
    let paid = service.checkout_status(&session_id).await.unwrap();
    assert_eq!(paid.payment_status, "paid");
    assert_eq!(paid.amount_total, Some(12_000));

    // Polling again must not create a second member.
    service.checkout_status(&session_id).await.unwrap();

    let member = users.find_by_email("ada@alumni.test").await.unwrap().unwrap();
    assert_eq!(member.membership_tier, MembershipTier::ActiveYearly);
    assert_eq!(member.payment_status, MemberPaymentStatus::Active);
}

#[tokio::test]
async fn unknown_tier_is_rejected() {
    let (pool, _dir) = create_test_pool().await;
    let service = MembershipService::new(
        pool,
        Arc::new(RecordingProvider::new()),
        PaymentsConfig::default(),
    );

    let err = service.start_checkout(request("platinum")).await.unwrap_err();
    assert!(matches!(err, UserError::InvalidMembershipTier));
}
