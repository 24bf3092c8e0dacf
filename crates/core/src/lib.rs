pub mod config;
pub mod manifest;
pub mod orchestrator;
pub mod shopify;
pub mod testing;
pub mod workflow;

pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, BatchConfig, Config,
    ConfigError, InputConfig, SanitizedConfig,
};
pub use manifest::{load_order_numbers, ManifestError, OrderNumber};
pub use orchestrator::{BatchRunner, RunResult};
pub use shopify::{ApiError, Order, OrdersApi, ShopifyClient, Transaction};
pub use workflow::{CancelError, CancelStep, OrderCanceller};
