//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Configuration validation
//! - Secure API key storage via [`SecretString`]
//! - Deriving [`PipelineConfig`] for the analysis pipeline
//!
//! # Example
//!
//! ```
//! use bias_lens::config::{Config, SecretString, DEFAULT_MODEL};
//!
//! // Use Config::from_env() in production
//! let config = Config::new(SecretString::new("sk-ant-example-key"));
//!
//! assert_eq!(config.model, DEFAULT_MODEL);
//! let debug = format!("{config:?}");
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_RETRIES, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::pipeline::{PipelineConfig, DEFAULT_STAGE_TIMEOUT_MS, DEFAULT_VALIDATION_THRESHOLD, MAX_TEXT_CHARS};
use crate::text::PreprocessOptions;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default HTTP request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default maximum retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Application configuration.
///
/// Use [`Config::from_env`] to load it from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Anthropic API key (protected from logging via [`SecretString`]).
    pub api_key: SecretString,
    /// Anthropic model to use.
    pub model: String,
    /// Log level filter (error, warn, info, debug, trace).
    pub log_level: String,
    /// HTTP request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Maximum retry attempts per request.
    pub max_retries: u32,
    /// Timeout for each collaborator call in milliseconds.
    pub stage_timeout_ms: u64,
    /// Confidence needed to pass validation when the validator is down.
    pub validation_threshold: f64,
    /// Pattern library file; the built-in library when unset.
    pub pattern_library_path: Option<PathBuf>,
    /// Strip URLs before analysis.
    pub remove_urls: bool,
    /// Normalize quotes, dashes and ellipses before analysis.
    pub normalize_punctuation: bool,
    /// Lowercase text before analysis.
    pub lowercase_text: bool,
}

impl Config {
    /// Configuration with every optional value at its default.
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        let preprocess = PreprocessOptions::default();
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            stage_timeout_ms: DEFAULT_STAGE_TIMEOUT_MS,
            validation_threshold: DEFAULT_VALIDATION_THRESHOLD,
            pattern_library_path: None,
            remove_urls: preprocess.remove_urls,
            normalize_punctuation: preprocess.normalize_punctuation,
            lowercase_text: preprocess.lowercase,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ANTHROPIC_API_KEY`: Anthropic API key
    ///
    /// Optional environment variables (with defaults):
    /// - `ANTHROPIC_MODEL` (default: `claude-sonnet-4-20250514`)
    /// - `LOG_LEVEL` (default: `info`)
    /// - `REQUEST_TIMEOUT_MS` (default: `30000`)
    /// - `MAX_RETRIES` (default: `3`)
    /// - `STAGE_TIMEOUT_MS` (default: `60000`)
    /// - `VALIDATION_THRESHOLD` (default: `0.65`)
    /// - `PATTERN_LIBRARY_PATH` (default: built-in library)
    /// - `REMOVE_URLS`, `NORMALIZE_PUNCTUATION`, `LOWERCASE_TEXT`
    ///   (default: `true`, `true`, `false`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `ANTHROPIC_API_KEY` is missing, a value
    /// cannot be parsed, or a value fails [`validate_config`].
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| ConfigError::MissingRequired {
                var: "ANTHROPIC_API_KEY".into(),
            })?;
        let defaults = Self::new(SecretString::new(api_key));

        let config = Self {
            model: std::env::var("ANTHROPIC_MODEL").unwrap_or(defaults.model),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            request_timeout_ms: parse_env("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms)?,
            max_retries: parse_env("MAX_RETRIES", defaults.max_retries)?,
            stage_timeout_ms: parse_env("STAGE_TIMEOUT_MS", defaults.stage_timeout_ms)?,
            validation_threshold: parse_env("VALIDATION_THRESHOLD", defaults.validation_threshold)?,
            pattern_library_path: std::env::var_os("PATTERN_LIBRARY_PATH")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            remove_urls: parse_env_bool("REMOVE_URLS", defaults.remove_urls)?,
            normalize_punctuation: parse_env_bool(
                "NORMALIZE_PUNCTUATION",
                defaults.normalize_punctuation,
            )?,
            lowercase_text: parse_env_bool("LOWERCASE_TEXT", defaults.lowercase_text)?,
            api_key: defaults.api_key,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Text cleaning options.
    #[must_use]
    pub const fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            remove_urls: self.remove_urls,
            normalize_punctuation: self.normalize_punctuation,
            lowercase: self.lowercase_text,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            stage_timeout: Duration::from_millis(config.stage_timeout_ms),
            validation_threshold: config.validation_threshold,
            preprocess: config.preprocess_options(),
            max_text_chars: MAX_TEXT_CHARS,
        }
    }
}

/// Parse an environment variable, using a default if not set.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: format!("cannot parse '{val}'"),
        })
    })
}

/// Parse a boolean flag: `true`/`false`, `1`/`0`, `yes`/`no`.
fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        match val.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: name.into(),
                reason: "must be true or false".into(),
            }),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "ANTHROPIC_API_KEY",
        "ANTHROPIC_MODEL",
        "LOG_LEVEL",
        "REQUEST_TIMEOUT_MS",
        "MAX_RETRIES",
        "STAGE_TIMEOUT_MS",
        "VALIDATION_THRESHOLD",
        "PATTERN_LIBRARY_PATH",
        "REMOVE_URLS",
        "NORMALIZE_PUNCTUATION",
        "LOWERCASE_TEXT",
    ];

    fn setup_test_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn invalid_var(result: Result<Config, ConfigError>) -> String {
        match result.unwrap_err() {
            ConfigError::InvalidValue { var, .. } | ConfigError::MissingRequired { var } => var,
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        setup_test_env();
        env::set_var("ANTHROPIC_API_KEY", "sk-ant-test-key");

        let config = Config::from_env().expect("should load config");

        assert_eq!(config, Config::new(SecretString::new("sk-ant-test-key")));
        assert_eq!(config.stage_timeout_ms, DEFAULT_STAGE_TIMEOUT_MS);
        assert_eq!(config.pattern_library_path, None);
        assert_eq!(config.preprocess_options(), PreprocessOptions::default());
    }

    #[test]
    #[serial]
    fn test_config_from_env_with_all_vars() {
        setup_test_env();
        env::set_var("ANTHROPIC_API_KEY", "sk-ant-test-key-123");
        env::set_var("ANTHROPIC_MODEL", "claude-opus-4");
        env::set_var("LOG_LEVEL", "debug");
        env::set_var("REQUEST_TIMEOUT_MS", "45000");
        env::set_var("MAX_RETRIES", "5");
        env::set_var("STAGE_TIMEOUT_MS", "90000");
        env::set_var("VALIDATION_THRESHOLD", "0.8");
        env::set_var("PATTERN_LIBRARY_PATH", "/etc/bias-lens/patterns.json");
        env::set_var("REMOVE_URLS", "no");
        env::set_var("NORMALIZE_PUNCTUATION", "0");
        env::set_var("LOWERCASE_TEXT", "TRUE");

        let config = Config::from_env().expect("should load config");

        assert_eq!(config.api_key.expose(), "sk-ant-test-key-123");
        assert_eq!(config.model, "claude-opus-4");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout_ms, 45_000);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.stage_timeout_ms, 90_000);
        assert_eq!(config.validation_threshold, 0.8);
        assert_eq!(
            config.pattern_library_path,
            Some(PathBuf::from("/etc/bias-lens/patterns.json"))
        );
        assert!(!config.remove_urls);
        assert!(!config.normalize_punctuation);
        assert!(config.lowercase_text);
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_missing_api_key() {
        setup_test_env();
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingRequired { var }) if var == "ANTHROPIC_API_KEY"
        ));
    }

    #[test]
    #[serial]
    fn test_config_unparseable_values() {
        for (var, value) in [
            ("REQUEST_TIMEOUT_MS", "not-a-number"),
            ("MAX_RETRIES", "-1"),
            ("VALIDATION_THRESHOLD", "high"),
            ("LOWERCASE_TEXT", "maybe"),
        ] {
            setup_test_env();
            env::set_var("ANTHROPIC_API_KEY", "sk-ant-test-key");
            env::set_var(var, value);
            assert_eq!(invalid_var(Config::from_env()), var);
        }
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_validation_failures() {
        for (var, value) in [
            ("REQUEST_TIMEOUT_MS", "100"),
            ("STAGE_TIMEOUT_MS", "999999"),
            ("MAX_RETRIES", "20"),
            ("VALIDATION_THRESHOLD", "1.2"),
        ] {
            setup_test_env();
            env::set_var("ANTHROPIC_API_KEY", "sk-ant-test-key");
            env::set_var(var, value);
            assert_eq!(invalid_var(Config::from_env()), var);
        }
        setup_test_env();
    }

    #[test]
    #[serial]
    fn test_config_empty_api_key_validation() {
        setup_test_env();
        env::set_var("ANTHROPIC_API_KEY", "");
        assert_eq!(invalid_var(Config::from_env()), "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_pipeline_config_from_config() {
        let mut config = Config::new(SecretString::new("k"));
        config.stage_timeout_ms = 1500;
        config.validation_threshold = 0.5;
        config.lowercase_text = true;

        let pipeline = PipelineConfig::from(&config);

        assert_eq!(pipeline.stage_timeout, Duration::from_millis(1500));
        assert_eq!(pipeline.validation_threshold, 0.5);
        assert!(pipeline.preprocess.lowercase);
        assert_eq!(pipeline.max_text_chars, MAX_TEXT_CHARS);
    }
}
