//! Anthropic API client.
//!
//! This module provides:
//! - Direct Claude Messages API integration
//! - Retry logic with exponential backoff
//! - Status code mapping to [`AnthropicError`](crate::error::AnthropicError)
//!
//! [`AnthropicClient`] implements [`AnthropicClientTrait`](crate::traits::AnthropicClientTrait),
//! which is what the LLM-backed stages depend on.

mod client;
mod config;
mod types;

pub use client::{AnthropicClient, MAX_MESSAGES, MAX_REQUEST_BYTES};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
pub use types::{ApiErrorBody, ApiErrorDetails, ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock};
