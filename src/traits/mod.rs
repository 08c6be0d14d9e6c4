//! Trait definitions for the pipeline's collaborators.
//!
//! This module defines traits for:
//! - [`AnthropicClientTrait`]: model completion client
//! - [`SentenceSplitter`]: text to sentences
//! - [`SubtleBiasDetector`], [`DetectionValidator`], [`ExplanationGenerator`],
//!   [`FramingAnalyzer`]: the LLM-backed stages
//! - [`TimeProvider`]: clock abstraction for report timestamps
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use bias_lens::text::PunctuationSplitter;
//! use bias_lens::traits::SentenceSplitter;
//!
//! let sentences = PunctuationSplitter::default().split("One. Two.");
//! assert_eq!(sentences, vec!["One.", "Two."]);
//! ```

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Usage};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::detector::SentenceDetection;
use crate::error::StageError;
use crate::pipeline::{
    ArticleAnalysis, ArticleMetadata, CandidateDetection, Explanation, SubtleDetection,
    ValidatedDetection,
};

/// Model completion client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnthropicClientTrait: Send + Sync {
    /// Send a completion request.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the call fails.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, StageError>;
}

/// Splits text into sentences.
#[cfg_attr(test, mockall::automock)]
pub trait SentenceSplitter: Send + Sync {
    /// Split `text` into sentences, in order. Empty text yields no sentences.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Finds biases and fallacies that surface patterns miss.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubtleBiasDetector: Send + Sync {
    /// Analyze `sentences` of `text`, given what the rule-based engine found.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the analysis fails.
    async fn detect(
        &self,
        text: &str,
        sentences: &[String],
        rule_based: &[SentenceDetection],
    ) -> Result<Vec<SubtleDetection>, StageError>;
}

/// Accepts or rejects candidate detections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetectionValidator: Send + Sync {
    /// Return one verdict per candidate.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if validation fails.
    async fn validate(
        &self,
        candidates: &[CandidateDetection],
        text: &str,
    ) -> Result<Vec<ValidatedDetection>, StageError>;
}

/// Writes plain-language explanations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    /// Explain one detection.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if generation fails.
    async fn explain(&self, detection: &ValidatedDetection) -> Result<Explanation, StageError>;
}

/// Assesses article-level framing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FramingAnalyzer: Send + Sync {
    /// Analyze the framing of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the analysis fails.
    async fn analyze(
        &self,
        text: &str,
        metadata: Option<ArticleMetadata>,
        detections: &[ValidatedDetection],
    ) -> Result<ArticleAnalysis, StageError>;
}

/// Time provider trait for mocking.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::detector::Detection;
    use crate::patterns::Category;
    use crate::pipeline::SourceDetector;
    use static_assertions::assert_impl_all;

    assert_impl_all!(RealTimeProvider: Send, Sync, Clone, Copy, Default);

    fn candidate() -> CandidateDetection {
        CandidateDetection {
            detection: Detection {
                category: Category::Fallacy,
                name: "Straw Man".to_string(),
                description: String::new(),
                matches: vec![],
                confidence: 0.7,
            },
            sentence: "So you want no rules at all.".to_string(),
            sentence_index: 0,
            source_detector: SourceDetector::RuleBased,
            quoted_text: None,
            reasoning: None,
            is_subtle: false,
        }
    }

    #[test]
    fn test_real_time_provider_now() {
        let before = Utc::now();
        let now = RealTimeProvider.now();
        assert!(now >= before);
        assert!(now <= Utc::now());
    }

    #[test]
    fn test_mock_time_provider() {
        let fixed = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut mock = MockTimeProvider::new();
        mock.expect_now().return_const(fixed);
        assert_eq!(mock.now(), fixed);
    }

    #[test]
    fn test_mock_sentence_splitter() {
        let mut mock = MockSentenceSplitter::new();
        mock.expect_split()
            .with(mockall::predicate::eq("a b"))
            .returning(|text| text.split(' ').map(String::from).collect());
        assert_eq!(mock.split("a b"), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_mock_anthropic_client() {
        let mut mock = MockAnthropicClientTrait::new();
        mock.expect_complete().returning(|_msgs, _config| {
            Ok(CompletionResponse::new("Mock response", Usage::new(10, 20)))
        });

        let response = mock
            .complete(vec![Message::user("Test")], CompletionConfig::new())
            .await
            .unwrap();
        assert_eq!(response.content, "Mock response");
        assert_eq!(response.usage.total(), 30);
    }

    #[tokio::test]
    async fn test_mock_anthropic_client_error() {
        let mut mock = MockAnthropicClientTrait::new();
        mock.expect_complete().returning(|_msgs, _config| {
            Err(StageError::ApiUnavailable {
                message: "Test error".to_string(),
            })
        });

        let result = mock
            .complete(vec![Message::user("Test")], CompletionConfig::new())
            .await;
        assert!(matches!(result, Err(StageError::ApiUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_mock_validator() {
        let mut mock = MockDetectionValidator::new();
        mock.expect_validate().returning(|candidates, _text| {
            Ok(candidates
                .iter()
                .cloned()
                .map(|c| ValidatedDetection::from_candidate(c, true, 0.8, "looks right"))
                .collect())
        });

        let validated = mock.validate(&[candidate()], "text").await.unwrap();
        assert_eq!(validated.len(), 1);
        assert!(validated[0].is_validated);
        assert_eq!(validated[0].validation_score, 0.8);
    }

    #[tokio::test]
    async fn test_mock_framing_analyzer_error() {
        let mut mock = MockFramingAnalyzer::new();
        mock.expect_analyze()
            .returning(|_, _, _| Err(StageError::Timeout { elapsed_ms: 10 }));
        let result = mock.analyze("text", None, &[]).await;
        assert!(matches!(result, Err(StageError::Timeout { elapsed_ms: 10 })));
    }
}
