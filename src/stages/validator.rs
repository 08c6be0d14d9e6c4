//! LLM-backed validation of candidate detections.

use async_trait::async_trait;
use serde_json::Value;

use super::core::{
    extract_json, optional_str, required_array, required_bool, required_index, STAGE_TEMPERATURE,
};
use crate::error::StageError;
use crate::pipeline::{CandidateDetection, ValidatedDetection};
use crate::prompts::{validation_system_prompt, validation_user_message};
use crate::traits::{AnthropicClientTrait, CompletionConfig, DetectionValidator, Message};

const MAX_TOKENS: u32 = 4096;

/// Reasoning attached to candidates the model returned no verdict for.
pub const NO_VERDICT_REASONING: &str = "No verdict returned by validator";

/// One parsed verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Candidate index the verdict refers to.
    pub index: usize,
    /// Accepted or rejected.
    pub is_valid: bool,
    /// Score in `[0, 1]`, if given.
    pub score: Option<f64>,
    /// Justification.
    pub reasoning: String,
}

/// Validates candidates with one model call.
#[derive(Debug)]
pub struct LlmValidator<C> {
    client: C,
}

impl<C: AnthropicClientTrait> LlmValidator<C> {
    /// Create a validator backed by `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: AnthropicClientTrait> DetectionValidator for LlmValidator<C> {
    async fn validate(
        &self,
        candidates: &[CandidateDetection],
        text: &str,
    ) -> Result<Vec<ValidatedDetection>, StageError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let messages = vec![Message::user(validation_user_message(candidates, text))];
        let config = CompletionConfig::new()
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(STAGE_TEMPERATURE)
            .with_system_prompt(validation_system_prompt());

        let response = self.client.complete(messages, config).await?;
        let json = extract_json(&response.content)?;
        let verdicts = parse_verdicts(&json)?;
        let validated = apply_verdicts(candidates, &verdicts);

        tracing::debug!(
            candidates = candidates.len(),
            verdicts = verdicts.len(),
            accepted = validated.iter().filter(|v| v.is_validated).count(),
            "Validation parsed"
        );
        Ok(validated)
    }
}

/// Parse the `validations` array of a validator response.
///
/// # Errors
///
/// Returns [`StageError::MissingField`] or [`StageError::InvalidValue`] if
/// the array or a required verdict field is absent or mistyped.
pub fn parse_verdicts(json: &Value) -> Result<Vec<Verdict>, StageError> {
    required_array(json, "validations")?
        .iter()
        .map(|item| {
            Ok(Verdict {
                index: required_index(item, "index")?,
                is_valid: required_bool(item, "is_valid")?,
                score: item.get("score").and_then(Value::as_f64).map(|s| s.clamp(0.0, 1.0)),
                reasoning: optional_str(item, "reasoning").unwrap_or_default(),
            })
        })
        .collect()
}

/// Map verdicts back onto candidates by index.
///
/// The first verdict for an index wins; verdicts for unknown indices are
/// ignored. Candidates without a verdict are returned as not validated. A
/// missing score defaults to the candidate confidence when accepted and `0`
/// when rejected.
#[must_use]
pub fn apply_verdicts(candidates: &[CandidateDetection], verdicts: &[Verdict]) -> Vec<ValidatedDetection> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            match verdicts.iter().find(|v| v.index == index) {
                Some(verdict) => {
                    let fallback = if verdict.is_valid {
                        candidate.detection.confidence
                    } else {
                        0.0
                    };
                    ValidatedDetection::from_candidate(
                        candidate.clone(),
                        verdict.is_valid,
                        verdict.score.unwrap_or(fallback),
                        verdict.reasoning.clone(),
                    )
                }
                None => ValidatedDetection::from_candidate(candidate.clone(), false, 0.0, NO_VERDICT_REASONING),
            }
        })
        .collect()
}
