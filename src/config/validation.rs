use crate::config::types::{Config, HttpConfig, MonitorConfig, StoreConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_monitor_config(&config.monitor)?;
    validate_http_config(&config.http)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates monitoring loop configuration
fn validate_monitor_config(config: &MonitorConfig) -> Result<(), ConfigError> {
    if config.interval_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "interval-ms must be >= 1, got {}",
            config.interval_ms
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry control characters
    if config.user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent contains control characters: {:?}",
            config.user_agent
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
