//! LLM-backed subtle bias detection.

use async_trait::async_trait;
use serde_json::Value;

use super::core::{
    extract_json, optional_str, required_array, required_f64, required_index, required_str,
    STAGE_TEMPERATURE,
};
use crate::detector::SentenceDetection;
use crate::error::StageError;
use crate::patterns::Category;
use crate::pipeline::SubtleDetection;
use crate::prompts::{subtle_detection_system_prompt, subtle_detection_user_message};
use crate::traits::{AnthropicClientTrait, CompletionConfig, Message, SubtleBiasDetector};

const MAX_TOKENS: u32 = 4096;

/// Finds implicit biases and fallacies with a model call.
#[derive(Debug)]
pub struct LlmSubtleDetector<C> {
    client: C,
}

impl<C: AnthropicClientTrait> LlmSubtleDetector<C> {
    /// Create a detector backed by `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: AnthropicClientTrait> SubtleBiasDetector for LlmSubtleDetector<C> {
    async fn detect(
        &self,
        text: &str,
        sentences: &[String],
        rule_based: &[SentenceDetection],
    ) -> Result<Vec<SubtleDetection>, StageError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let messages = vec![Message::user(subtle_detection_user_message(
            text, sentences, rule_based,
        ))];
        let config = CompletionConfig::new()
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(STAGE_TEMPERATURE)
            .with_system_prompt(subtle_detection_system_prompt());

        let response = self.client.complete(messages, config).await?;
        let json = extract_json(&response.content)?;
        let detections = parse_subtle_detections(&json, sentences)?;

        tracing::debug!(
            detections = detections.len(),
            output_tokens = response.usage.output_tokens,
            "Subtle detection parsed"
        );
        Ok(detections)
    }
}

/// Parse the `detections` array of a subtle-detection response.
///
/// Items whose sentence index is outside `sentences` or whose category is
/// not recognized are dropped. Confidence is clamped to `[0, 1]`.
///
/// # Errors
///
/// Returns [`StageError::MissingField`] or [`StageError::InvalidValue`] if
/// the array or a required item field is absent or mistyped.
pub fn parse_subtle_detections(
    json: &Value,
    sentences: &[String],
) -> Result<Vec<SubtleDetection>, StageError> {
    let mut detections = Vec::new();

    for item in required_array(json, "detections")? {
        let sentence_index = required_index(item, "sentence_index")?;
        let name = required_str(item, "name")?.trim().to_string();
        let category_label = required_str(item, "category")?;
        let confidence = required_f64(item, "confidence")?;

        let Some(sentence) = sentences.get(sentence_index) else {
            tracing::debug!(sentence_index, %name, "Dropping detection with out-of-range sentence index");
            continue;
        };
        let Some(category) = Category::parse_lenient(category_label) else {
            tracing::debug!(category = category_label, %name, "Dropping detection with unknown category");
            continue;
        };
        if name.is_empty() {
            continue;
        }

        detections.push(SubtleDetection {
            sentence: sentence.clone(),
            sentence_index,
            name,
            category,
            quoted_text: optional_str(item, "quoted_text").unwrap_or_default(),
            reasoning: optional_str(item, "reasoning").unwrap_or_default(),
            confidence: confidence.clamp(0.0, 1.0),
            is_subtle: item.get("is_subtle").and_then(Value::as_bool).unwrap_or(true),
        });
    }
    Ok(detections)
}
