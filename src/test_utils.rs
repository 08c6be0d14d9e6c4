//! Test utilities and mock factories.
//!
//! Shared fixtures for unit tests:
//! - Mock completion clients with canned replies
//! - Detection, candidate and validated-detection builders
//! - A collaborator set where every call fails
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use crate::detector::Detection;
use crate::error::StageError;
use crate::patterns::Category;
use crate::pipeline::{CandidateDetection, Collaborators, SourceDetector, ValidatedDetection};
use crate::traits::{
    CompletionResponse, MockAnthropicClientTrait, MockDetectionValidator,
    MockExplanationGenerator, MockFramingAnalyzer, MockSubtleBiasDetector, Usage,
};

/// Mock client answering every call with `response`.
#[must_use]
pub fn mock_anthropic_success(response: impl Into<String>) -> MockAnthropicClientTrait {
    let response = response.into();
    let mut mock = MockAnthropicClientTrait::new();
    mock.expect_complete().returning(move |_msgs, _config| {
        Ok(CompletionResponse::new(response.clone(), Usage::new(100, 50)))
    });
    mock
}

/// Mock client failing every call with `error`.
#[must_use]
pub fn mock_anthropic_error(error: StageError) -> MockAnthropicClientTrait {
    let mut mock = MockAnthropicClientTrait::new();
    mock.expect_complete()
        .returning(move |_msgs, _config| Err(error.clone()));
    mock
}

/// A detection without pattern matches.
#[must_use]
pub fn detection(category: Category, name: &str, confidence: f64) -> Detection {
    Detection {
        category,
        name: name.to_string(),
        description: format!("{name} description"),
        matches: Vec::new(),
        confidence,
    }
}

/// A rule-based candidate for `sentence`.
#[must_use]
pub fn candidate(
    sentence_index: usize,
    sentence: &str,
    category: Category,
    name: &str,
    confidence: f64,
) -> CandidateDetection {
    CandidateDetection {
        detection: detection(category, name, confidence),
        sentence: sentence.to_string(),
        sentence_index,
        source_detector: SourceDetector::RuleBased,
        quoted_text: None,
        reasoning: None,
        is_subtle: false,
    }
}

/// An accepted detection whose validation score equals its confidence.
#[must_use]
pub fn validated(sentence: &str, category: Category, name: &str, confidence: f64) -> ValidatedDetection {
    ValidatedDetection::from_candidate(
        candidate(0, sentence, category, name, confidence),
        true,
        confidence,
        "accepted",
    )
}

/// Collaborators whose every call returns [`StageError::ApiUnavailable`].
#[must_use]
pub fn failing_collaborators() -> Collaborators {
    let down = || StageError::ApiUnavailable {
        message: "down".into(),
    };

    let mut subtle = MockSubtleBiasDetector::new();
    subtle.expect_detect().returning(move |_, _, _| Err(down()));
    let mut validator = MockDetectionValidator::new();
    validator.expect_validate().returning(move |_, _| Err(down()));
    let mut explainer = MockExplanationGenerator::new();
    explainer.expect_explain().returning(move |_| Err(down()));
    let mut framing = MockFramingAnalyzer::new();
    framing.expect_analyze().returning(move |_, _, _| Err(down()));

    Collaborators {
        subtle: Arc::new(subtle),
        validator: Arc::new(validator),
        explainer: Arc::new(explainer),
        framing: Arc::new(framing),
    }
}
