use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// Shopify Admin API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API key for HTTP basic auth
    pub key: String,
    /// API password/secret for HTTP basic auth
    pub secret: String,
    /// Store subdomain, e.g. "my-store" for my-store.myshopify.com
    pub shop: String,
    /// Admin API version segment (default: "2020-07")
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Currency for void transactions. Fixed per run, never derived
    /// from the order being cancelled.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_api_version() -> String {
    "2020-07".to_string()
}

fn default_currency() -> String {
    "JPY".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Batch execution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Maximum number of orders being cancelled at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Whether the customer is emailed about the cancellation
    #[serde(default = "default_notify_customer")]
    pub notify_customer: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            notify_customer: default_notify_customer(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_notify_customer() -> bool {
    true
}

/// Input manifest configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Path to the order manifest (default: "orders.csv")
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("orders.csv")
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub batch: BatchConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub key: String,
    pub shop: String,
    pub api_version: String,
    pub currency: String,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                key: config.api.key.clone(),
                shop: config.api.shop.clone(),
                api_version: config.api.api_version.clone(),
                currency: config.api.currency.clone(),
                timeout_secs: config.api.timeout_secs,
            },
            batch: config.batch.clone(),
            input: config.input.clone(),
        }
    }
}
