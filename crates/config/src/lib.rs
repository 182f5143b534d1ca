use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "alumni.toml",
    "config/alumni.toml",
    "crates/config/alumni.toml",
    "../alumni.toml",
    "../config/alumni.toml",
    "../crates/config/alumni.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    const fn default_busy_timeout() -> u64 {
        5_000
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://alumni.db".to_string(),
            max_connections: 10,
            busy_timeout_ms: Self::default_busy_timeout(),
        }
    }
}

/// Where uploaded newsletters, documents, profile photos and chat images land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    pub directory: String,
    /// URL prefix the directory is served under.
    pub public_path: String,
    pub max_upload_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            directory: "uploads".to_string(),
            public_path: "/uploads".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Hosted checkout settings.
///
/// ```
/// use alumni_config::PaymentsConfig;
///
/// let payments = PaymentsConfig::default();
/// assert_eq!(payments.api_base, "https://api.stripe.com");
/// assert_eq!(payments.currency, "usd");
/// assert!(payments.stripe_api_key.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    #[serde(default)]
    pub stripe_api_key: Option<String>,
    #[serde(default = "PaymentsConfig::default_api_base")]
    pub api_base: String,
    #[serde(default = "PaymentsConfig::default_currency")]
    pub currency: String,
    /// Base URL of the web client; success and cancel redirects are built from it.
    #[serde(default = "PaymentsConfig::default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "PaymentsConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl PaymentsConfig {
    fn default_api_base() -> String {
        "https://api.stripe.com".to_string()
    }

    fn default_currency() -> String {
        "usd".to_string()
    }

    fn default_public_base_url() -> String {
        "http://localhost:3000".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: None,
            api_base: Self::default_api_base(),
            currency: Self::default_currency(),
            public_base_url: Self::default_public_base_url(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Shipping rule for the merchandise cart, in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub free_shipping_threshold_cents: i64,
    pub flat_shipping_cents: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold_cents: 5_000,
            flat_shipping_cents: 899,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub channel_capacity: usize,
    pub max_message_length: usize,
    pub history_limit: i64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 100,
            max_message_length: 4_000,
            history_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use alumni_config::load;
///
/// std::env::remove_var("ALUMNI_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = config::Config::try_from(&AppConfig::default())
        .context("unable to serialise default configuration")?;

    let mut builder = config::Config::builder().add_source(defaults);

    let environment_overrides = config::Environment::with_prefix("ALUMNI")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ALUMNI_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ALUMNI_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.database.max_connections == 0 {
        config.database.max_connections = 1;
    }

    // An empty key in the environment means "unset", not "authenticate with nothing".
    if config
        .payments
        .stripe_api_key
        .as_deref()
        .is_some_and(|key| key.trim().is_empty())
    {
        config.payments.stripe_api_key = None;
    }

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_defaults_match_free_shipping_rule() {
        let shop = ShopConfig::default();
        assert_eq!(shop.free_shipping_threshold_cents, 5_000);
        assert_eq!(shop.flat_shipping_cents, 899);
    }

    #[test]
    fn cors_wildcard_detection() {
        assert!(CorsConfig::default().allows_any_origin());
        let strict = CorsConfig {
            allowed_origins: vec!["https://icaa.example".to_string()],
        };
        assert!(!strict.allows_any_origin());
    }
}
