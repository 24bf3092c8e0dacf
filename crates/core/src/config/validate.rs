use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API credentials and shop are non-empty
/// - Batch concurrency is at least 1
/// - Request timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.key.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.key cannot be empty".to_string(),
        ));
    }

    if config.api.secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.secret cannot be empty".to_string(),
        ));
    }

    if config.api.shop.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.shop cannot be empty".to_string(),
        ));
    }

    if config.batch.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "batch.concurrency must be at least 1".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
