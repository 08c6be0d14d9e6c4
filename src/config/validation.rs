//! Configuration validation.
//!
//! Range checks for values loaded from the environment.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Maximum allowed retry count.
pub const MAX_RETRIES: u32 = 10;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `ANTHROPIC_API_KEY` must not be empty
/// - `REQUEST_TIMEOUT_MS` and `STAGE_TIMEOUT_MS` must be between 1000 and 300000
/// - `MAX_RETRIES` must be between 0 and 10
/// - `VALIDATION_THRESHOLD` must be between 0 and 1
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api_key.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "ANTHROPIC_API_KEY".into(),
            reason: "must not be empty".into(),
        });
    }

    check_timeout("REQUEST_TIMEOUT_MS", config.request_timeout_ms)?;
    check_timeout("STAGE_TIMEOUT_MS", config.stage_timeout_ms)?;

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::InvalidValue {
            var: "MAX_RETRIES".into(),
            reason: format!("must be between 0 and {MAX_RETRIES}"),
        });
    }

    if !(0.0..=1.0).contains(&config.validation_threshold) {
        return Err(ConfigError::InvalidValue {
            var: "VALIDATION_THRESHOLD".into(),
            reason: "must be between 0 and 1".into(),
        });
    }

    Ok(())
}

fn check_timeout(var: &str, value: u64) -> Result<(), ConfigError> {
    if (MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            var: var.into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        })
    }
}
