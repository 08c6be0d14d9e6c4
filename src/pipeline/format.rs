//! Report formatting.

use std::fmt::Write as _;

use super::types::{HighlightedSegment, Severity, ValidatedDetection};
use crate::detector::{AnalysisSummary, SummaryEntry};

/// Locate each detection's sentence in the raw input.
///
/// Uses the first occurrence of the sentence text. Offsets are characters.
/// Sentences that no longer appear verbatim (after cleaning rewrote them)
/// produce no segment. Segments are stably sorted by start.
#[must_use]
pub fn highlight_segments(raw_text: &str, detections: &[ValidatedDetection]) -> Vec<HighlightedSegment> {
    let mut segments: Vec<HighlightedSegment> = detections
        .iter()
        .filter_map(|detection| {
            if detection.sentence.is_empty() {
                return None;
            }
            let byte_start = raw_text.find(&detection.sentence)?;
            let start = raw_text[..byte_start].chars().count();
            Some(HighlightedSegment {
                start,
                end: start + detection.sentence.chars().count(),
                text: detection.sentence.clone(),
                name: detection.detection.name.clone(),
                category: detection.detection.category,
                severity: Severity::from_confidence(detection.confidence()),
                confidence: detection.confidence(),
            })
        })
        .collect();

    segments.sort_by_key(|segment| segment.start);
    segments
}

/// One-line description of what was found.
#[must_use]
pub fn summary_text(summary: &AnalysisSummary, sentence_count: usize) -> String {
    if summary.is_empty() {
        return format!(
            "No cognitive biases or logical fallacies detected in {} {}.",
            sentence_count,
            plural(sentence_count, "sentence", "sentences")
        );
    }

    let biases: usize = summary.biases_found.iter().map(|e| e.count).sum();
    let fallacies: usize = summary.fallacies_found.iter().map(|e| e.count).sum();
    let mut text = format!(
        "Found {} {} and {} {} in {} {}.",
        biases,
        plural(biases, "cognitive bias", "cognitive biases"),
        fallacies,
        plural(fallacies, "logical fallacy", "logical fallacies"),
        sentence_count,
        plural(sentence_count, "sentence", "sentences")
    );

    let most_frequent = summary
        .biases_found
        .iter()
        .chain(&summary.fallacies_found)
        .fold(None, |best: Option<&SummaryEntry>, entry| match best {
            Some(b) if b.count >= entry.count => Some(b),
            _ => Some(entry),
        });
    if let Some(entry) = most_frequent {
        let _ = write!(text, " Most frequent: {} ({}).", entry.name, entry.count);
    }
    text
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::detector::Detection;
    use crate::patterns::Category;
    use crate::pipeline::SourceDetector;
    use pretty_assertions::assert_eq;

    fn validated(sentence: &str, name: &str, confidence: f64) -> ValidatedDetection {
        ValidatedDetection {
            detection: Detection {
                category: Category::Fallacy,
                name: name.to_string(),
                description: String::new(),
                matches: vec![],
                confidence,
            },
            sentence: sentence.to_string(),
            sentence_index: 0,
            source_detector: SourceDetector::RuleBased,
            is_validated: true,
            validation_score: confidence,
            validation_reasoning: String::new(),
            quoted_text: None,
        }
    }

    fn entry(name: &str, count: usize) -> SummaryEntry {
        SummaryEntry {
            name: name.to_string(),
            description: String::new(),
            count,
            confidence: 0.7,
        }
    }

    #[test]
    fn test_highlights_sorted_by_start() {
        let raw = "First claim. Second claim here.";
        let segments = highlight_segments(
            raw,
            &[
                validated("Second claim here.", "B", 0.85),
                validated("First claim.", "A", 0.5),
            ],
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].name, "A");
        assert_eq!((segments[0].start, segments[0].end), (0, 12));
        assert_eq!(segments[0].severity, Severity::Low);
        assert_eq!(segments[1].start, 13);
        assert_eq!(segments[1].severity, Severity::High);
    }

    #[test]
    fn test_highlight_offsets_are_characters() {
        let raw = "Événement. Everyone agrees.";
        let segments = highlight_segments(raw, &[validated("Everyone agrees.", "X", 0.7)]);
        assert_eq!(segments[0].start, 11);
        assert_eq!(segments[0].severity, Severity::Medium);
    }

    #[test]
    fn test_missing_sentence_skipped() {
        let segments = highlight_segments("Original text.", &[validated("rewritten text.", "X", 0.7)]);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_repeated_sentence_uses_first_occurrence() {
        let raw = "Same. Same.";
        let segments = highlight_segments(
            raw,
            &[validated("Same.", "A", 0.7), validated("Same.", "B", 0.7)],
        );
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments[1].start, 0);
        assert_eq!(segments[0].name, "A");
    }

    #[test]
    fn test_summary_text_empty() {
        assert_eq!(
            summary_text(&AnalysisSummary::default(), 1),
            "No cognitive biases or logical fallacies detected in 1 sentence."
        );
    }

    #[test]
    fn test_summary_text_counts() {
        let summary = AnalysisSummary {
            biases_found: vec![entry("Hindsight Bias", 1)],
            fallacies_found: vec![entry("Ad Hominem", 2), entry("Straw Man", 1)],
        };
        assert_eq!(
            summary_text(&summary, 4),
            "Found 1 cognitive bias and 3 logical fallacies in 4 sentences. Most frequent: Ad Hominem (2)."
        );
    }
}
