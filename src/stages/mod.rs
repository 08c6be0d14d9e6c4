//! LLM-backed pipeline stages.
//!
//! Each stage implements one collaborator trait from [`crate::traits`] on
//! top of any [`AnthropicClientTrait`](crate::traits::AnthropicClientTrait):
//! - [`LlmSubtleDetector`]: implicit biases and fallacies
//! - [`LlmValidator`]: false-positive filtering
//! - [`LlmExplainer`]: plain-language explanations
//! - [`LlmFramingAnalyzer`]: article-level framing
//!
//! Stages build a prompt from [`crate::prompts`], call the model at low
//! temperature, pull JSON out of the reply with [`extract_json`] and parse it
//! with field-level errors. Stages never fall back themselves; the pipeline
//! owns every fallback.

mod core;
mod explainer;
mod framing;
mod subtle;
mod validator;

pub use self::core::{extract_json, preview, STAGE_TEMPERATURE};
pub use explainer::{parse_explanation, LlmExplainer};
pub use framing::{parse_article_analysis, LlmFramingAnalyzer, MAX_CREDIBILITY};
pub use subtle::{parse_subtle_detections, LlmSubtleDetector};
pub use validator::{apply_verdicts, parse_verdicts, LlmValidator, Verdict, NO_VERDICT_REASONING};
