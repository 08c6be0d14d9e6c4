//! Local substitutes for collaborator output.

use super::types::{CandidateDetection, Explanation, ValidatedDetection};

/// Reasoning attached to candidates accepted without a validator.
pub const AUTO_VALIDATED_REASONING: &str = "Auto-validated: confidence above threshold";

/// Caveat attached to explanations written without the model.
pub const GENERIC_CAVEAT: &str =
    "Reasoning of this kind can lead readers to conclusions the evidence does not support.";

/// Accept candidates whose confidence reaches `threshold`.
#[must_use]
pub fn auto_validate(candidates: Vec<CandidateDetection>, threshold: f64) -> Vec<ValidatedDetection> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.detection.confidence >= threshold)
        .map(|candidate| {
            let score = candidate.detection.confidence;
            ValidatedDetection::from_candidate(candidate, true, score, AUTO_VALIDATED_REASONING)
        })
        .collect()
}

/// Explanation built from a static description.
#[must_use]
pub fn fallback_explanation(description: &str, detection: &ValidatedDetection) -> Explanation {
    Explanation {
        simple_explanation: description.to_string(),
        why_problematic: GENERIC_CAVEAT.to_string(),
        in_context: format!("Detected in: \"{}\"", detection.sentence),
        alternative_framing: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::detector::Detection;
    use crate::patterns::Category;
    use crate::pipeline::SourceDetector;
    use test_case::test_case;

    fn candidate(confidence: f64) -> CandidateDetection {
        CandidateDetection {
            detection: Detection {
                category: Category::Bias,
                name: "Anchoring".to_string(),
                description: "Relying on the first number".to_string(),
                matches: vec![],
                confidence,
            },
            sentence: "Originally $500, now $200.".to_string(),
            sentence_index: 3,
            source_detector: SourceDetector::RuleBased,
            quoted_text: None,
            reasoning: None,
            is_subtle: false,
        }
    }

    #[test_case(0.64, 0 ; "below threshold")]
    #[test_case(0.65, 1 ; "at threshold")]
    #[test_case(0.9, 1 ; "above threshold")]
    fn test_auto_validate_threshold(confidence: f64, expected: usize) {
        assert_eq!(auto_validate(vec![candidate(confidence)], 0.65).len(), expected);
    }

    #[test]
    fn test_auto_validate_fields() {
        let validated = auto_validate(vec![candidate(0.8)], 0.65);
        assert!(validated[0].is_validated);
        assert_eq!(validated[0].validation_score, 0.8);
        assert_eq!(validated[0].validation_reasoning, AUTO_VALIDATED_REASONING);
        assert_eq!(validated[0].sentence_index, 3);
    }

    #[test]
    fn test_fallback_explanation() {
        let validated = auto_validate(vec![candidate(0.8)], 0.0).remove(0);
        let explanation = fallback_explanation("Relying on the first number", &validated);
        assert_eq!(explanation.simple_explanation, "Relying on the first number");
        assert_eq!(explanation.why_problematic, GENERIC_CAVEAT);
        assert!(explanation.in_context.contains("Originally $500"));
        assert_eq!(explanation.alternative_framing, None);
    }
}
