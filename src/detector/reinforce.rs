//! Cross-sentence reinforcement.

use super::scorer::MAX_CONFIDENCE;
use super::types::SentenceDetection;

/// Boost applied when the same bias or fallacy appears in consecutive entries.
pub const CONTEXT_REINFORCEMENT_BOOST: f64 = 0.05;

/// Boost detections that recur in consecutive entries of the list.
///
/// Entries are consecutive in the list, not necessarily adjacent in the
/// source text. For each pair of consecutive entries, every detection in
/// the earlier entry that shares category and name with one in the later
/// entry boosts both by [`CONTEXT_REINFORCEMENT_BOOST`], capped at
/// [`MAX_CONFIDENCE`]. A single left-to-right pass; a middle entry can be
/// boosted once from each side.
#[must_use]
pub fn reinforce_context(mut results: Vec<SentenceDetection>) -> Vec<SentenceDetection> {
    for i in 1..results.len() {
        let (head, tail) = results.split_at_mut(i);
        let previous = &mut head[i - 1];
        let current = &mut tail[0];

        for prev in &mut previous.detections {
            for curr in &mut current.detections {
                if prev.same_kind(curr) {
                    prev.confidence = boost(prev.confidence);
                    curr.confidence = boost(curr.confidence);
                }
            }
        }
    }
    results
}

fn boost(confidence: f64) -> f64 {
    (confidence + CONTEXT_REINFORCEMENT_BOOST).min(MAX_CONFIDENCE)
}
