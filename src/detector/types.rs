//! Detection result types.

use serde::{Deserialize, Serialize};

use crate::patterns::Category;

/// Character span of a match within its sentence, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// First character of the match.
    pub start: usize,
    /// One past the last character of the match.
    pub end: usize,
}

/// One successful pattern hit in a sentence.
///
/// Offsets are character (not byte) positions in the sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Source text of the pattern that matched.
    pub pattern_text: String,
    /// The matched substring.
    pub matched_text: String,
    /// Character offset of the match start.
    pub start_offset: usize,
    /// Length of the match in characters.
    pub length: usize,
    /// Weight of the pattern.
    pub weight: f64,
}

impl PatternMatch {
    /// The span covered by this match.
    #[must_use]
    pub const fn span(&self) -> MatchSpan {
        MatchSpan {
            start: self.start_offset,
            end: self.start_offset + self.length,
        }
    }
}

/// A bias or fallacy found in one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bias or fallacy.
    pub category: Category,
    /// Definition name.
    pub name: String,
    /// Definition description.
    pub description: String,
    /// Non-excluded pattern matches, in pattern order.
    pub matches: Vec<PatternMatch>,
    /// Confidence in `[0.1, 0.95]`.
    pub confidence: f64,
}

impl Detection {
    /// Returns true if `other` refers to the same bias or fallacy.
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        self.category == other.category && self.name == other.name
    }
}

/// All detections of one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceDetection {
    /// The sentence as produced by the splitter.
    pub sentence: String,
    /// Zero-based position in the splitter output.
    pub sentence_index: usize,
    /// Detections in this sentence (never empty).
    pub detections: Vec<Detection>,
}

/// Aggregated occurrences of one bias or fallacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Definition name.
    pub name: String,
    /// Description of the first instance.
    pub description: String,
    /// Number of instances.
    pub count: usize,
    /// Maximum confidence over all instances.
    pub confidence: f64,
}

/// Per-name counts and confidence for biases and fallacies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Biases, by descending count.
    pub biases_found: Vec<SummaryEntry>,
    /// Fallacies, by descending count.
    pub fallacies_found: Vec<SummaryEntry>,
}

impl AnalysisSummary {
    /// Total number of instances across both lists.
    #[must_use]
    pub fn total_instances(&self) -> usize {
        self.biases_found
            .iter()
            .chain(&self.fallacies_found)
            .map(|entry| entry.count)
            .sum()
    }

    /// Returns true if nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.biases_found.is_empty() && self.fallacies_found.is_empty()
    }
}
