//! Test plan for the `alumni-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use alumni_config::{load, AppConfig, ChatConfig, HttpConfig, PaymentsConfig, UploadsConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "ALUMNI_CONFIG",
    "ALUMNI__CHAT__CHANNEL_CAPACITY",
    "ALUMNI__CORS__ALLOWED_ORIGINS",
    "ALUMNI__DATABASE__MAX_CONNECTIONS",
    "ALUMNI__DATABASE__URL",
    "ALUMNI__HTTP__ADDRESS",
    "ALUMNI__HTTP__PORT",
    "ALUMNI__PAYMENTS__STRIPE_API_KEY",
    "ALUMNI__PAYMENTS__PUBLIC_BASE_URL",
    "ALUMNI__SHOP__FLAT_SHIPPING_CENTS",
    "ALUMNI__UPLOADS__DIRECTORY",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.uploads.directory, defaults.uploads.directory);
    assert_eq!(config.payments.currency, defaults.payments.currency);
    assert!(config.payments.stripe_api_key.is_none());
    assert_eq!(
        config.shop.free_shipping_threshold_cents,
        defaults.shop.free_shipping_threshold_cents
    );
    assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "alumni.toml",
        r#"
        [http]
        address = "127.0.0.1"
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/alumni.toml",
        r#"
        [http]
        address = "127.0.0.1"
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "alumni.toml",
        r#"
        [http]
        port = 8181

        [database]
        max_connections = 50
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.http.port, 8181);
    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.database.max_connections, 50);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(config.chat.channel_capacity, defaults.chat.channel_capacity);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "alumni.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("ALUMNI__HTTP__PORT", "8080");
    ctx.set_var("ALUMNI__SHOP__FLAT_SHIPPING_CENTS", "500");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.shop.flat_shipping_cents, 500);
}

#[test]
#[serial]
fn load_reads_explicit_config_path() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [uploads]
        directory = "/var/lib/alumni/uploads"
        public_path = "/files"
        max_upload_bytes = 1024
        "#,
    );
    let path = temp_dir.path().join("elsewhere/custom.toml");
    ctx.set_var("ALUMNI_CONFIG", path.display().to_string());

    let config = load().expect("configuration load should use ALUMNI_CONFIG");
    assert_eq!(config.uploads.directory, "/var/lib/alumni/uploads");
    assert_eq!(config.uploads.public_path, "/files");
    assert_eq!(config.uploads.max_upload_bytes, 1024);
}

#[test]
#[serial]
fn load_splits_cors_origins_from_environment() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    ctx.set_var(
        "ALUMNI__CORS__ALLOWED_ORIGINS",
        "https://icaa.example,http://localhost:3000",
    );

    let config = load().expect("configuration load should parse origin list");
    assert_eq!(
        config.cors.allowed_origins,
        vec![
            "https://icaa.example".to_string(),
            "http://localhost:3000".to_string()
        ]
    );
    assert!(!config.cors.allows_any_origin());
}

#[test]
#[serial]
fn load_accepts_stripe_key_from_env() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    ctx.set_var("ALUMNI__PAYMENTS__STRIPE_API_KEY", "sk_test_123");

    let config = load().expect("configuration load should read the Stripe key");
    assert_eq!(config.payments.stripe_api_key.as_deref(), Some("sk_test_123"));
}

#[test]
#[serial]
fn load_treats_blank_stripe_key_as_unset() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "alumni.toml",
        r#"
        [payments]
        stripe_api_key = "   "
        "#,
    );

    let config = load().expect("configuration load should succeed");
    assert!(config.payments.stripe_api_key.is_none());
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "alumni.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn payments_config_defaults_point_at_stripe() {
    let defaults = PaymentsConfig::default();
    assert_eq!(defaults.api_base, "https://api.stripe.com");
    assert_eq!(defaults.public_base_url, "http://localhost:3000");
    assert_eq!(defaults.request_timeout_seconds, 30);
}

#[test]
fn chat_and_upload_defaults_are_bounded() {
    let chat = ChatConfig::default();
    assert_eq!(chat.channel_capacity, 100);
    assert_eq!(chat.max_message_length, 4_000);

    let uploads = UploadsConfig::default();
    assert_eq!(uploads.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(uploads.public_path, "/uploads");
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 8001);
}
