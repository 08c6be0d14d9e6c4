//! Anthropic Messages API wire types.

#![allow(clippy::derive_partial_eq_without_eq)]

use serde::{Deserialize, Serialize};

/// Request body for `POST /messages`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0-1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Conversation messages.
    pub messages: Vec<ApiMessage>,
}

impl ApiRequest {
    /// Create a request with the required fields.
    #[must_use]
    pub fn new(model: impl Into<String>, max_tokens: u32, messages: Vec<ApiMessage>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature: None,
            system: None,
            messages,
        }
    }

    /// Set temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Total size of message and system text in bytes.
    #[must_use]
    pub fn content_bytes(&self) -> usize {
        self.messages.iter().map(|m| m.content.len()).sum::<usize>()
            + self.system.as_ref().map_or(0, String::len)
    }
}

/// One message in a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiMessage {
    /// `user` or `assistant`.
    pub role: String,
    /// Plain text content.
    pub content: String,
}

impl ApiMessage {
    /// User message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response body of a successful call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Message id.
    #[serde(default)]
    pub id: String,
    /// Content blocks.
    pub content: Vec<ContentBlock>,
    /// Model that answered.
    #[serde(default)]
    pub model: String,
    /// Token usage.
    #[serde(default)]
    pub usage: ApiUsage,
    /// Why generation stopped.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl ApiResponse {
    /// Text blocks joined by newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content block in a response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text.
        text: String,
    },
    /// Any block type this client does not use.
    #[serde(other)]
    Other,
}

impl ContentBlock {
    /// Text of a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other => None,
        }
    }
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub struct ApiUsage {
    /// Input tokens.
    pub input_tokens: u32,
    /// Output tokens.
    pub output_tokens: u32,
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Always `error`.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error details.
    pub error: ApiErrorDetails,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Error kind, e.g. `invalid_request_error`.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message.
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization_skips_unset() {
        let request = ApiRequest::new("claude-x", 1000, vec![ApiMessage::user("Hello")]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-x");
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("temperature").is_none());
        assert!(value.get("system").is_none());
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::new("m", 10, vec![ApiMessage::assistant("{")])
            .with_temperature(0.2)
            .with_system("sys");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.system.as_deref(), Some("sys"));
        assert_eq!(request.messages[0].role, "assistant");
        assert_eq!(request.content_bytes(), 4);
    }

    #[test]
    fn test_response_text_joins_and_skips_other_blocks() {
        let response: ApiResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ],
            "model": "claude",
            "usage": {"input_tokens": 3, "output_tokens": 4},
            "stop_reason": "end_turn"
        }))
        .unwrap();
        assert_eq!(response.text(), "first\nsecond");
        assert_eq!(response.content[0], ContentBlock::Other);
        assert_eq!(response.usage.output_tokens, 4);
    }

    #[test]
    fn test_error_body_parse() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "max_tokens too large"}
        }))
        .unwrap();
        assert_eq!(body.error.error_type, "invalid_request_error");
        assert_eq!(body.error.message, "max_tokens too large");
    }
}
