//! LLM-backed explanations.

use async_trait::async_trait;
use serde_json::Value;

use super::core::{extract_json, optional_str, required_str, STAGE_TEMPERATURE};
use crate::error::StageError;
use crate::pipeline::{Explanation, ValidatedDetection};
use crate::prompts::{explanation_system_prompt, explanation_user_message};
use crate::traits::{AnthropicClientTrait, CompletionConfig, ExplanationGenerator, Message};

const MAX_TOKENS: u32 = 1024;

/// Writes one explanation per call.
#[derive(Debug)]
pub struct LlmExplainer<C> {
    client: C,
}

impl<C: AnthropicClientTrait> LlmExplainer<C> {
    /// Create an explainer backed by `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: AnthropicClientTrait> ExplanationGenerator for LlmExplainer<C> {
    async fn explain(&self, detection: &ValidatedDetection) -> Result<Explanation, StageError> {
        let messages = vec![Message::user(explanation_user_message(detection))];
        let config = CompletionConfig::new()
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(STAGE_TEMPERATURE)
            .with_system_prompt(explanation_system_prompt());

        let response = self.client.complete(messages, config).await?;
        parse_explanation(&extract_json(&response.content)?)
    }
}

/// Parse an explanation object.
///
/// # Errors
///
/// Returns [`StageError::MissingField`] if a required field is absent.
pub fn parse_explanation(json: &Value) -> Result<Explanation, StageError> {
    Ok(Explanation {
        simple_explanation: required_str(json, "simple_explanation")?.to_string(),
        why_problematic: required_str(json, "why_problematic")?.to_string(),
        in_context: required_str(json, "in_context")?.to_string(),
        alternative_framing: optional_str(json, "alternative_framing"),
    })
}
