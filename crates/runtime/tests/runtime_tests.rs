use std::{path::Path, time::Duration};

use alumni_config::AppConfig;
use alumni_payments::PaymentError;
use alumni_runtime::{self, BackendServices};
use anyhow::{Context, Result};
use sqlx::Row;
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(temp_dir: &TempDir, database_url: String, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = database_url;
    config.database.max_connections = max_connections;
    config.uploads.directory = temp_dir
        .path()
        .join("uploads")
        .to_string_lossy()
        .into_owned();
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_runs_migrations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/init.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 4);

    let services = initialise(&config).await?;
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'events', 'chat_messages') ORDER BY name",
    )
    .fetch_all(&services.db_pool)
    .await?;

    assert_eq!(vec!["chat_messages", "events", "users"], tables);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_creates_the_upload_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("uploads.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 1);
    let uploads = temp_dir.path().join("uploads");

    assert!(!uploads.exists());
    initialise(&config).await?;
    assert!(uploads.is_dir(), "upload directory should be created");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_stripe_key_disables_checkout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(&temp_dir, "sqlite://:memory:".into(), 1);

    let services = initialise(&config).await?;
    let error = services
        .payment_provider
        .checkout_status("cs_test_1")
        .await
        .err()
        .context("expected the disabled provider to refuse")?;
    assert!(matches!(error, PaymentError::NotConfigured));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stripe_key_builds_a_live_provider() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = build_config(&temp_dir, "sqlite://:memory:".into(), 1);
    config.payments.stripe_api_key = Some("sk_test_runtime".into());
    config.payments.api_base = "http://127.0.0.1:9".into();
    config.payments.request_timeout_seconds = 1;

    let services = initialise(&config).await?;
    let error = services
        .payment_provider
        .checkout_status("cs_test_1")
        .await
        .err()
        .context("expected an unreachable provider to fail")?;
    assert!(!matches!(error, PaymentError::NotConfigured));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_creates_sqlite_directory_if_missing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_dir = temp_dir.path().join("nested");
    let db_path = db_dir.join("prepared.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);

    assert!(!db_dir.exists());

    initialise(&config).await?;
    assert!(db_dir.exists(), "database directory should be created");
    assert!(db_path.exists(), "sqlite database file should be created");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_enables_sqlite_foreign_keys() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/foreign_keys.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);

    let services = initialise(&config).await?;

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&services.db_pool)
        .await?;
    assert_eq!(1, enabled, "foreign key enforcement must be enabled");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_applies_max_connections_setting() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/max_conn.db");
    let max_connections = 3;
    let config = build_config(&temp_dir, sqlite_url(&db_path), max_connections);

    let services = initialise(&config).await?;
    assert_eq!(
        max_connections,
        services.db_pool.options().get_max_connections()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_database_leaves_no_file_behind() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(&temp_dir, "sqlite://:memory:".into(), 1);
    let services = initialise(&config).await?;

    let databases = sqlx::query("PRAGMA database_list")
        .fetch_all(&services.db_pool)
        .await?;
    let main_db = databases
        .into_iter()
        .find(|row| {
            row.try_get::<String, _>("name")
                .map(|name| name == "main")
                .unwrap_or(false)
        })
        .context("expected main in PRAGMA database_list")?;
    let file: String = main_db.try_get("file")?;
    assert!(
        file.is_empty(),
        "in-memory sqlite database should not create filesystem entries"
    );
    Ok(())
}

#[test]
fn telemetry_init_tracing_sets_global_subscriber() {
    alumni_runtime::telemetry::init_tracing().expect("first initialisation should succeed");

    let second = alumni_runtime::telemetry::init_tracing();
    assert!(
        second.is_err(),
        "initialising telemetry twice should fail with global subscriber already set"
    );
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(unix), ignore = "requires Unix signal handling")]
async fn shutdown_signal_completes_on_ctrl_c_notification() -> Result<()> {
    let shutdown_task = tokio::spawn(async { alumni_runtime::shutdown_signal().await });

    sleep(Duration::from_millis(50)).await;
    #[cfg(unix)]
    unsafe {
        libc::raise(libc::SIGINT);
    }

    timeout(Duration::from_secs(2), shutdown_task).await??;
    Ok(())
}
