use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cancellara_core::{
    load_config, load_order_numbers, validate_config, BatchRunner, OrderCanceller, RunResult,
    SanitizedConfig, ShopifyClient,
};

#[tokio::main]
async fn main() {
    match run().await {
        Ok(result) if result.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<RunResult> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("CANCELLARA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        shop = %sanitized.api.shop,
        currency = %sanitized.api.currency,
        concurrency = sanitized.batch.concurrency,
        "Configuration loaded successfully"
    );

    // Manifest path: first CLI argument, falling back to the configured one
    let manifest_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.input.path.clone());

    info!("Loading order manifest from {:?}", manifest_path);
    let order_numbers = load_order_numbers(&manifest_path)
        .with_context(|| format!("Failed to load order manifest from {:?}", manifest_path))?;

    if order_numbers.is_empty() {
        info!("Manifest contains no orders, nothing to do");
        return Ok(RunResult {
            total: 0,
            failed: vec![],
        });
    }
    info!(orders = order_numbers.len(), "Order manifest loaded");

    // Wire up the client, workflow and runner
    let client = Arc::new(ShopifyClient::new(config.api.clone()));
    let canceller = Arc::new(OrderCanceller::new(
        client,
        config.api.currency.clone(),
        config.batch.notify_customer,
    ));
    let runner = BatchRunner::new(canceller, config.batch.concurrency);

    let result = runner.run(&order_numbers).await;

    if result.is_success() {
        info!(cancelled = result.succeeded(), "All orders cancelled");
    } else {
        error!(
            cancelled = result.succeeded(),
            failed = ?result.failed,
            "Run finished with failed orders"
        );
    }

    Ok(result)
}
