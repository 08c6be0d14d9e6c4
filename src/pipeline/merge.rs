//! Merging rule-based and LLM findings into candidates.

use super::types::{CandidateDetection, SourceDetector, SubtleDetection};
use crate::detector::{
    BiasDetector, Detection, SentenceDetection, MAX_CONFIDENCE, MIN_CONFIDENCE,
};

/// Combine both detection branches into one candidate list.
///
/// Rule-based detections come first, in sentence order. An LLM finding for
/// the same sentence, category and name (case-insensitive) upgrades the
/// rule-based candidate to [`SourceDetector::Both`], keeping the higher
/// confidence and the LLM's quote and reasoning. Other LLM findings are
/// appended as [`SourceDetector::Llm`] candidates, described by the library
/// definition when one exists and by the model's reasoning otherwise.
///
/// Model confidences are clamped to the detector's
/// `[MIN_CONFIDENCE, MAX_CONFIDENCE]` range before they are stored.
#[must_use]
pub fn merge_candidates(
    detector: &BiasDetector,
    rule_based: Vec<SentenceDetection>,
    subtle: Vec<SubtleDetection>,
) -> Vec<CandidateDetection> {
    let mut candidates: Vec<CandidateDetection> = rule_based
        .into_iter()
        .flat_map(|sentence| {
            let SentenceDetection {
                sentence: text,
                sentence_index,
                detections,
            } = sentence;
            detections.into_iter().map(move |detection| CandidateDetection {
                detection,
                sentence: text.clone(),
                sentence_index,
                source_detector: SourceDetector::RuleBased,
                quoted_text: None,
                reasoning: None,
                is_subtle: false,
            })
        })
        .collect();
    let rule_based_count = candidates.len();

    for finding in subtle {
        let confidence = finding.confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
        if let Some(existing) = candidates[..rule_based_count]
            .iter_mut()
            .find(|candidate| candidate.matches_subtle(&finding))
        {
            existing.source_detector = SourceDetector::Both;
            existing.detection.confidence = existing.detection.confidence.max(confidence);
            existing.quoted_text = Some(finding.quoted_text);
            existing.reasoning = Some(finding.reasoning);
            existing.is_subtle = finding.is_subtle;
            continue;
        }

        let description = detector
            .definition(finding.category, &finding.name)
            .map_or_else(|| finding.reasoning.clone(), |d| d.description.clone());
        candidates.push(CandidateDetection {
            detection: Detection {
                category: finding.category,
                name: finding.name,
                description,
                matches: Vec::new(),
                confidence,
            },
            sentence: finding.sentence,
            sentence_index: finding.sentence_index,
            source_detector: SourceDetector::Llm,
            quoted_text: Some(finding.quoted_text),
            reasoning: Some(finding.reasoning),
            is_subtle: finding.is_subtle,
        });
    }

    tracing::debug!(
        rule_based = rule_based_count,
        total = candidates.len(),
        "Merged detection candidates"
    );
    candidates
}
