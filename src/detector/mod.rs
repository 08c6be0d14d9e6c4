//! Deterministic rule-based detection engine.
//!
//! This module provides:
//! - Sentence matching ([`find_matches`]) and exclusion filtering ([`is_excluded`])
//! - Multi-layer confidence scoring ([`calculate_confidence`], [`is_near`])
//! - The per-sentence and per-text detector ([`BiasDetector`])
//! - Cross-sentence reinforcement ([`reinforce_context`])
//! - Per-name aggregation ([`summarize`])
//!
//! Everything here is synchronous, pure and reproducible without network
//! access. A [`BiasDetector`] compiles its library once and can be shared
//! across threads behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use bias_lens::detector::BiasDetector;
//! use bias_lens::patterns::CategoryFilter;
//!
//! let detector = BiasDetector::standard().unwrap();
//! let detections =
//!     detector.detect_in_sentence("I knew this would happen with the new policy.", CategoryFilter::All);
//! assert_eq!(detections[0].name, "Hindsight Bias");
//! ```

mod matcher;
mod reinforce;
mod scorer;
mod summary;
mod types;

pub use matcher::{find_matches, is_excluded};
pub use reinforce::{reinforce_context, CONTEXT_REINFORCEMENT_BOOST};
pub use scorer::{
    calculate_confidence, default_window_chars, is_near, BASE_CONFIDENCE, MAX_CONFIDENCE,
    MIN_CONFIDENCE,
};
pub use summary::{summarize, summarize_detections};
pub use types::{
    AnalysisSummary, Detection, MatchSpan, PatternMatch, SentenceDetection, SummaryEntry,
};

use crate::error::PatternError;
use crate::patterns::{
    compile_definitions, BiasOrFallacyDefinition, Category, CategoryFilter, CompiledDefinition,
    GlobalConfidenceModifiers, PatternLibrary,
};
use crate::traits::SentenceSplitter;

/// Rule-based bias and fallacy detector.
///
/// Holds the compiled definitions of one [`PatternLibrary`] together with its
/// global confidence modifiers. Immutable after construction.
#[derive(Debug, Clone)]
pub struct BiasDetector {
    biases: Vec<CompiledDefinition>,
    fallacies: Vec<CompiledDefinition>,
    global_modifiers: GlobalConfidenceModifiers,
}

impl BiasDetector {
    /// Compile a detector from a pattern library.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] if any pattern or exclusion
    /// fails to compile.
    pub fn new(library: &PatternLibrary) -> Result<Self, PatternError> {
        let biases = compile_definitions(&library.biases)?;
        let fallacies = compile_definitions(&library.fallacies)?;
        tracing::debug!(
            biases = biases.len(),
            fallacies = fallacies.len(),
            version = library.version,
            "Compiled pattern library"
        );
        Ok(Self {
            biases,
            fallacies,
            global_modifiers: library.global_modifiers.clone(),
        })
    }

    /// Compile a detector from the built-in standard library.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the embedded library fails to load.
    pub fn standard() -> Result<Self, PatternError> {
        Self::new(&PatternLibrary::standard()?)
    }

    /// Compiled definitions of one category, in library order.
    #[must_use]
    pub fn compiled(&self, category: Category) -> &[CompiledDefinition] {
        match category {
            Category::Bias => &self.biases,
            Category::Fallacy => &self.fallacies,
        }
    }

    /// Global modifiers in effect.
    #[must_use]
    pub const fn global_modifiers(&self) -> &GlobalConfidenceModifiers {
        &self.global_modifiers
    }

    /// Look up a definition by category and case-insensitive name.
    #[must_use]
    pub fn definition(&self, category: Category, name: &str) -> Option<&BiasOrFallacyDefinition> {
        self.compiled(category)
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .map(|c| &c.definition)
    }

    /// Detect biases and fallacies in a single sentence.
    ///
    /// Biases are checked before fallacies, each in library order. A
    /// definition yields a detection when at least one pattern matches and
    /// no exclusion does.
    #[must_use]
    pub fn detect_in_sentence(&self, sentence: &str, filter: CategoryFilter) -> Vec<Detection> {
        if sentence.trim().is_empty() {
            return Vec::new();
        }

        let mut detections = Vec::new();
        for category in [Category::Bias, Category::Fallacy] {
            if !filter.includes(category) {
                continue;
            }
            for compiled in self.compiled(category) {
                let matches = find_matches(sentence, compiled);
                if matches.is_empty() {
                    continue;
                }
                if is_excluded(sentence, compiled) {
                    tracing::trace!(definition = %compiled.name(), "Sentence excluded");
                    continue;
                }
                let confidence = calculate_confidence(
                    &matches,
                    sentence,
                    &compiled.definition,
                    &self.global_modifiers,
                );
                detections.push(Detection {
                    category,
                    name: compiled.definition.name.clone(),
                    description: compiled.definition.description.clone(),
                    matches,
                    confidence,
                });
            }
        }
        detections
    }

    /// Detect biases and fallacies across a text.
    ///
    /// Only sentences with at least one detection are returned, in splitter
    /// order and carrying their splitter index. Context reinforcement is
    /// applied to the result.
    #[must_use]
    pub fn detect_in_text(&self, text: &str, splitter: &dyn SentenceSplitter) -> Vec<SentenceDetection> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.detect_in_sentences(&splitter.split(text))
    }

    /// Detect across already-split sentences.
    #[must_use]
    pub fn detect_in_sentences(&self, sentences: &[String]) -> Vec<SentenceDetection> {
        let results: Vec<SentenceDetection> = sentences
            .iter()
            .enumerate()
            .filter_map(|(sentence_index, sentence)| {
                let detections = self.detect_in_sentence(sentence, CategoryFilter::All);
                (!detections.is_empty()).then(|| SentenceDetection {
                    sentence: sentence.clone(),
                    sentence_index,
                    detections,
                })
            })
            .collect();

        tracing::debug!(
            sentences = sentences.len(),
            flagged = results.len(),
            "Rule-based detection complete"
        );
        reinforce_context(results)
    }
}
