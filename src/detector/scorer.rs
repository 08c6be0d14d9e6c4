//! Multi-layer confidence scoring.
//!
//! Scoring starts at [`BASE_CONFIDENCE`] and applies, in this fixed order:
//! weighted match contribution, context clues, global modifiers,
//! definition-specific modifiers, then clamps to
//! [`MIN_CONFIDENCE`]..=[`MAX_CONFIDENCE`].
//!
//! Term tests are case-insensitive substring tests. Context clues and
//! negation terms are proximity-gated through [`is_near`]; every other term
//! counts anywhere in the sentence.

use super::types::{MatchSpan, PatternMatch};
use crate::patterns::{BiasOrFallacyDefinition, GlobalConfidenceModifiers};

/// Starting confidence for any detection.
pub const BASE_CONFIDENCE: f64 = 0.5;
/// Lower clamp.
pub const MIN_CONFIDENCE: f64 = 0.1;
/// Upper clamp.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Multiplier applied to the summed pattern weights.
pub const MATCH_WEIGHT_SCALE: f64 = 0.2;
/// Cap on the weighted match contribution.
pub const MAX_MATCH_CONTRIBUTION: f64 = 0.4;
/// Adjustment per positive or negative context clue.
pub const CONTEXT_CLUE_ADJUSTMENT: f64 = 0.05;
/// Boost per high-confidence term.
pub const HIGH_CONFIDENCE_BOOST: f64 = 0.05;
/// Boost per definition-specific term.
pub const BIAS_SPECIFIC_BOOST: f64 = 0.07;
/// Penalty per negation term near a match.
pub const NEGATION_PENALTY: f64 = 0.1;
/// Penalty per uncertainty term.
pub const UNCERTAINTY_PENALTY: f64 = 0.03;
/// Penalty per hedging term.
pub const HEDGING_PENALTY: f64 = 0.02;
/// Proximity radius in words.
pub const DEFAULT_WINDOW_RADIUS: usize = 5;
/// Characters per word used to approximate the proximity window.
pub const CHARS_PER_WORD: usize = 5;

/// Proximity window in characters for the default radius.
#[must_use]
pub const fn default_window_chars() -> usize {
    DEFAULT_WINDOW_RADIUS * CHARS_PER_WORD
}

/// Returns true if `term` occurs within `window_chars` characters of `span`.
///
/// The searched region is `[span.start - window_chars, span.end + window_chars]`
/// clipped to the sentence. Comparison is case-insensitive; an empty term
/// never matches.
#[must_use]
pub fn is_near(sentence: &str, span: MatchSpan, term: &str, window_chars: usize) -> bool {
    if term.is_empty() {
        return false;
    }
    let total = sentence.chars().count();
    let lo = span.start.saturating_sub(window_chars).min(total);
    let hi = span.end.saturating_add(window_chars).min(total);
    if lo >= hi {
        return false;
    }
    let window: String = sentence.chars().skip(lo).take(hi - lo).collect();
    window.to_lowercase().contains(&term.to_lowercase())
}

/// Compute the confidence of a detection.
///
/// Always returns a value in `[MIN_CONFIDENCE, MAX_CONFIDENCE]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_confidence(
    matches: &[PatternMatch],
    sentence: &str,
    definition: &BiasOrFallacyDefinition,
    global: &GlobalConfidenceModifiers,
) -> f64 {
    let lowered = sentence.to_lowercase();
    let window = default_window_chars();
    let near_any = |term: &str| {
        matches
            .iter()
            .any(|m| is_near(sentence, m.span(), term, window))
    };

    let mut confidence = BASE_CONFIDENCE;

    let weight_sum: f64 = matches.iter().map(|m| m.weight).sum();
    confidence += (weight_sum * MATCH_WEIGHT_SCALE).min(MAX_MATCH_CONTRIBUTION);

    if let Some(clues) = &definition.context_clues {
        confidence += count_distinct(&clues.positive, &near_any) as f64 * CONTEXT_CLUE_ADJUSTMENT;
        confidence -= count_distinct(&clues.negative, &near_any) as f64 * CONTEXT_CLUE_ADJUSTMENT;
    }

    let anywhere = |term: &str| !term.is_empty() && lowered.contains(&term.to_lowercase());

    confidence += count_distinct(&global.high_confidence_terms, &anywhere) as f64
        * HIGH_CONFIDENCE_BOOST;
    confidence -= count_distinct(&global.negation_terms, &near_any) as f64 * NEGATION_PENALTY;
    confidence -=
        count_distinct(&global.uncertainty_terms, &anywhere) as f64 * UNCERTAINTY_PENALTY;
    confidence -= count_distinct(&global.hedging_terms, &anywhere) as f64 * HEDGING_PENALTY;

    if let Some(specific) = &definition.confidence_modifiers {
        confidence += count_distinct(&specific.bias_specific_terms, &anywhere) as f64
            * BIAS_SPECIFIC_BOOST;
        confidence += count_distinct(&specific.high_confidence_terms, &anywhere) as f64
            * HIGH_CONFIDENCE_BOOST;
        confidence -=
            count_distinct(&specific.negation_terms, &near_any) as f64 * NEGATION_PENALTY;
        confidence -= count_distinct(&specific.uncertainty_terms, &anywhere) as f64
            * UNCERTAINTY_PENALTY;
    }

    let clamped = confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    tracing::trace!(
        definition = %definition.name,
        matches = matches.len(),
        raw = confidence,
        confidence = clamped,
        "Confidence scored"
    );
    clamped
}

/// Count the distinct terms (case-insensitive) that satisfy `present`.
fn count_distinct(terms: &[String], present: &impl Fn(&str) -> bool) -> usize {
    let mut seen: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let key = term.to_lowercase();
        if !seen.contains(&key) && present(term) {
            seen.push(key);
        }
    }
    seen.len()
}
