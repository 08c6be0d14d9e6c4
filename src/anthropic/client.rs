//! Anthropic API client with retry logic.
//!
//! This module provides:
//! - HTTP client for the Anthropic Messages API
//! - Retry logic with exponential backoff
//! - Request size validation
//! - Status code mapping to [`AnthropicError`]

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use super::config::ClientConfig;
use super::types::{ApiErrorBody, ApiMessage, ApiRequest, ApiResponse};
use crate::config::SecretString;
use crate::error::{AnthropicError, StageError};
use crate::traits::{AnthropicClientTrait, CompletionConfig, CompletionResponse, Message, Usage};

/// Maximum request content size in bytes.
pub const MAX_REQUEST_BYTES: usize = 400_000;
/// Maximum number of messages per request.
pub const MAX_MESSAGES: usize = 50;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Retry-after assumed when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Anthropic API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: SecretString,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Create a new client.
    pub fn new(api_key: impl Into<SecretString>, config: ClientConfig) -> Result<Self, AnthropicError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AnthropicError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a client with default configuration.
    pub fn with_api_key(api_key: impl Into<SecretString>) -> Result<Self, AnthropicError> {
        Self::new(api_key, ClientConfig::default())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request, retrying retryable failures with exponential backoff.
    pub async fn send_message(&self, request: ApiRequest) -> Result<ApiResponse, AnthropicError> {
        Self::validate_request(&request)?;

        let mut delay = self.config.retry_delay_ms;
        let mut attempt = 0;
        loop {
            match self.execute_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, delay_ms = delay, "Retrying Anthropic request");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn validate_request(request: &ApiRequest) -> Result<(), AnthropicError> {
        if request.messages.is_empty() {
            return Err(AnthropicError::InvalidRequest {
                message: "Request has no messages".to_string(),
            });
        }
        if request.messages.len() > MAX_MESSAGES {
            return Err(AnthropicError::InvalidRequest {
                message: format!("Too many messages: {} > {MAX_MESSAGES}", request.messages.len()),
            });
        }
        let bytes = request.content_bytes();
        if bytes > MAX_REQUEST_BYTES {
            return Err(AnthropicError::InvalidRequest {
                message: format!("Request too large: {bytes} > {MAX_REQUEST_BYTES} bytes"),
            });
        }
        Ok(())
    }

    async fn execute_once(&self, request: &ApiRequest) -> Result<ApiResponse, AnthropicError> {
        let url = format!("{}/messages", self.config.base_url);
        let start = Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            "Starting Anthropic API request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnthropicError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    AnthropicError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        tracing::debug!(
            status = %response.status(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Anthropic API response received"
        );

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_error_status(status, response, &request.model).await);
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| AnthropicError::UnexpectedResponse {
                message: format!("Failed to parse response: {e}"),
            })?;

        if body.text().is_empty() {
            return Err(AnthropicError::UnexpectedResponse {
                message: "No text content in response".to_string(),
            });
        }
        Ok(body)
    }

    async fn map_error_status(status: StatusCode, response: Response, model: &str) -> AnthropicError {
        match status.as_u16() {
            401 => AnthropicError::AuthenticationFailed,
            429 => AnthropicError::RateLimited {
                retry_after_seconds: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS),
            },
            529 => AnthropicError::ModelOverloaded {
                model: model.to_string(),
            },
            400 => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or(body);
                AnthropicError::InvalidRequest { message }
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                AnthropicError::UnexpectedResponse {
                    message: format!("Status {status}: {body}"),
                }
            }
        }
    }

    fn build_request(&self, messages: Vec<Message>, config: CompletionConfig) -> ApiRequest {
        let api_messages = messages
            .into_iter()
            .map(|m| {
                if m.role == "assistant" {
                    ApiMessage::assistant(m.content)
                } else {
                    ApiMessage::user(m.content)
                }
            })
            .collect();

        let max_tokens = config.max_tokens.unwrap_or(self.config.default_max_tokens);
        let mut request = ApiRequest::new(&self.config.model, max_tokens, api_messages);
        if let Some(temperature) = config.temperature {
            request = request.with_temperature(f64::from(temperature));
        }
        if let Some(system) = config.system_prompt {
            request = request.with_system(system);
        }
        request
    }
}

#[async_trait]
impl AnthropicClientTrait for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, StageError> {
        let request = self.build_request(messages, config);
        let response = self
            .send_message(request)
            .await
            .map_err(|e| StageError::ApiUnavailable {
                message: e.to_string(),
            })?;

        Ok(CompletionResponse::new(
            response.text(),
            Usage::new(response.usage.input_tokens, response.usage.output_tokens),
        ))
    }
}

#[async_trait]
impl AnthropicClientTrait for Arc<AnthropicClient> {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, StageError> {
        <AnthropicClient as AnthropicClientTrait>::complete(self.as_ref(), messages, config).await
    }
}
