//! Error types for bias-lens.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`PatternError`]: Pattern library construction errors (fatal at startup)
//! - [`StageError`]: LLM collaborator stage failures (always recovered locally)
//! - [`AnalysisError`]: Invalid input rejected before any processing
//! - [`AnthropicError`]: Anthropic API specific errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level application error.
///
/// Wraps all subsystem errors for unified handling in the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Anthropic API error.
    #[error("Anthropic API error: {0}")]
    Anthropic(#[from] AnthropicError),

    /// Pattern library error.
    #[error("Pattern library error: {0}")]
    Pattern(#[from] PatternError),

    /// Collaborator stage error.
    #[error("Stage error: {0}")]
    Stage(#[from] StageError),

    /// Analysis input error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Anthropic API errors.
///
/// These errors represent failures when communicating with the Anthropic API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The requested model is overloaded.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// The model that is overloaded.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl AnthropicError {
    /// Returns true if this error is retryable.
    ///
    /// Rate limiting, overload, timeout and network errors are retryable.
    /// Authentication and invalid request errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ModelOverloaded { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }
}

/// Pattern library construction errors.
///
/// A library that fails to load or compile is corrupt; these are never
/// silently degraded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A pattern or exclusion failed to compile.
    #[error("Invalid pattern in {definition}: {pattern} - {message}")]
    InvalidPattern {
        /// Name of the owning definition.
        definition: String,
        /// The offending pattern text.
        pattern: String,
        /// Compiler message.
        message: String,
    },

    /// A pattern weight is outside `[0, 1]`.
    #[error("Invalid weight {weight} for pattern {pattern} in {definition}")]
    InvalidWeight {
        /// Name of the owning definition.
        definition: String,
        /// The pattern text.
        pattern: String,
        /// The weight that was rejected.
        weight: String,
    },

    /// Two definitions in one category share a name.
    #[error("Duplicate {category} definition: {name}")]
    DuplicateName {
        /// Category of the duplicate.
        category: String,
        /// The duplicated name.
        name: String,
    },

    /// A definition has an empty name.
    #[error("Empty definition name in {category}")]
    EmptyName {
        /// Category containing the unnamed definition.
        category: String,
    },

    /// Library schema version is not supported.
    #[error("Unsupported library version {version} (supported: 1..={max})")]
    UnsupportedVersion {
        /// Version found in the document.
        version: u32,
        /// Highest supported version.
        max: u32,
    },

    /// Library document is not valid JSON or has an unknown shape.
    #[error("Malformed library document: {message}")]
    Malformed {
        /// Parser message.
        message: String,
    },

    /// Library file could not be read.
    #[error("Failed to read library {path}: {message}")]
    Io {
        /// Path that was read.
        path: String,
        /// I/O message.
        message: String,
    },
}

/// Collaborator stage errors.
///
/// These errors represent failures of the LLM-backed pipeline stages. The
/// pipeline recovers from every one of them with a local fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    /// Missing required field in a collaborator response.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Invalid value for a field.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// JSON parsing failed.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Description of the parsing error.
        message: String,
    },

    /// API is unavailable.
    #[error("API unavailable: {message}")]
    ApiUnavailable {
        /// Description of why the API is unavailable.
        message: String,
    },

    /// Stage timed out.
    #[error("Stage timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds.
        elapsed_ms: u64,
    },
}

/// Invalid call-site input, rejected before the pipeline starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Text is empty or whitespace only.
    #[error("Text to analyze is empty")]
    EmptyText,

    /// Text exceeds the accepted size.
    #[error("Text too long: {length} > {max} characters")]
    TextTooLong {
        /// Length of the submitted text in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
