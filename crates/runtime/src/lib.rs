use std::sync::Arc;

use anyhow::{Context, Result};
use alumni_config::AppConfig;
use alumni_database::initialize_database;
use alumni_payments::{DisabledProvider, PaymentProvider, StripeCheckout};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub payment_provider: Arc<dyn PaymentProvider>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        tokio::fs::create_dir_all(&config.uploads.directory)
            .await
            .with_context(|| {
                format!("failed to create upload directory {}", config.uploads.directory)
            })?;

        let payment_provider = payment_provider(config)?;

        Ok(Self {
            db_pool,
            payment_provider,
        })
    }
}

/// Stripe when a key is configured; otherwise payment endpoints answer 503.
fn payment_provider(config: &AppConfig) -> Result<Arc<dyn PaymentProvider>> {
    let has_key = config
        .payments
        .stripe_api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());

    if !has_key {
        warn!("no stripe api key configured, paid checkouts are disabled");
        return Ok(Arc::new(DisabledProvider));
    }

    let stripe = StripeCheckout::new(&config.payments)
        .context("failed to build stripe checkout client")?;
    info!(api_base = %config.payments.api_base, "stripe checkout enabled");
    Ok(Arc::new(stripe))
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
