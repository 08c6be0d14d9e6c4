//! LLM-backed article framing analysis.

use async_trait::async_trait;
use serde_json::Value;

use super::core::{extract_json, required_f64, required_str, string_list, STAGE_TEMPERATURE};
use crate::error::StageError;
use crate::pipeline::{
    ArticleAnalysis, ArticleMetadata, EmotionalLanguage, SourceCredibility, ValidatedDetection,
};
use crate::prompts::{framing_system_prompt, framing_user_message};
use crate::traits::{AnthropicClientTrait, CompletionConfig, FramingAnalyzer, Message};

const MAX_TOKENS: u32 = 2048;

/// Upper bound of the credibility scale.
pub const MAX_CREDIBILITY: f64 = 10.0;

/// Assesses article framing with one model call.
#[derive(Debug)]
pub struct LlmFramingAnalyzer<C> {
    client: C,
}

impl<C: AnthropicClientTrait> LlmFramingAnalyzer<C> {
    /// Create an analyzer backed by `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: AnthropicClientTrait> FramingAnalyzer for LlmFramingAnalyzer<C> {
    async fn analyze(
        &self,
        text: &str,
        metadata: Option<ArticleMetadata>,
        detections: &[ValidatedDetection],
    ) -> Result<ArticleAnalysis, StageError> {
        let messages = vec![Message::user(framing_user_message(
            text,
            metadata.as_ref(),
            detections,
        ))];
        let config = CompletionConfig::new()
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(STAGE_TEMPERATURE)
            .with_system_prompt(framing_system_prompt());

        let response = self.client.complete(messages, config).await?;
        let analysis = parse_article_analysis(&extract_json(&response.content)?)?;
        tracing::debug!(
            tone = %analysis.overall_tone,
            credibility = analysis.credibility_score,
            "Framing analysis parsed"
        );
        Ok(analysis)
    }
}

/// Parse a framing analysis object.
///
/// Tone, intent and credibility are required. Credibility is clamped to
/// `[0, 10]`; tone confidence and emotional score to `[0, 1]`.
///
/// # Errors
///
/// Returns [`StageError::MissingField`] if a required field is absent.
pub fn parse_article_analysis(json: &Value) -> Result<ArticleAnalysis, StageError> {
    let emotional = json.get("emotional_language").unwrap_or(&Value::Null);
    let credibility = json.get("source_credibility").unwrap_or(&Value::Null);

    Ok(ArticleAnalysis {
        overall_tone: required_str(json, "overall_tone")?.to_string(),
        confidence_in_tone: json
            .get("confidence_in_tone")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0),
        primary_intent: required_str(json, "primary_intent")?.to_string(),
        credibility_score: required_f64(json, "credibility_score")?.clamp(0.0, MAX_CREDIBILITY),
        manipulation_techniques: string_list(json, "manipulation_techniques"),
        omitted_perspectives: string_list(json, "omitted_perspectives"),
        framing_category: json
            .get("framing_category")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        emotional_language: EmotionalLanguage {
            score: emotional
                .get("score")
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
                .clamp(0.0, 1.0),
            examples: string_list(emotional, "examples"),
        },
        source_credibility: SourceCredibility {
            assessment: credibility
                .get("assessment")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            factors: string_list(credibility, "factors"),
        },
    })
}
