//! Pattern library data model.
//!
//! The library document is JSON. Current (v2) documents use snake_case field
//! names and weighted pattern objects; legacy (v1) documents may use the
//! camelCase names and bare pattern strings. Both shapes deserialize into the
//! same types. Unknown fields are rejected.

use serde::{Deserialize, Serialize};

/// Default weight for patterns that do not carry one.
pub const DEFAULT_PATTERN_WEIGHT: f64 = 0.5;

const fn default_weight() -> f64 {
    DEFAULT_PATTERN_WEIGHT
}

/// Whether a definition describes a cognitive bias or a logical fallacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Cognitive bias.
    Bias,
    /// Logical fallacy.
    Fallacy,
}

impl Category {
    /// Lowercase label, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bias => "bias",
            Self::Fallacy => "fallacy",
        }
    }

    /// Parse a category label leniently (`bias`, `biases`, `fallacy`, ...).
    #[must_use]
    pub fn parse_lenient(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "bias" | "biases" | "cognitive bias" | "cognitive_bias" => Some(Self::Bias),
            "fallacy" | "fallacies" | "logical fallacy" | "logical_fallacy" => {
                Some(Self::Fallacy)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which categories a detection pass should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    /// Biases and fallacies.
    #[default]
    All,
    /// Biases only.
    BiasesOnly,
    /// Fallacies only.
    FallaciesOnly,
}

impl CategoryFilter {
    /// Returns true if the filter admits `category`.
    #[must_use]
    pub const fn includes(self, category: Category) -> bool {
        matches!(
            (self, category),
            (Self::All, _) | (Self::BiasesOnly, Category::Bias) | (Self::FallaciesOnly, Category::Fallacy)
        )
    }
}

/// A weighted matchable expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPattern")]
pub struct PatternSpec {
    /// Regular expression source, matched case-insensitively.
    pub pattern: String,
    /// Contribution weight in `[0, 1]`.
    pub weight: f64,
    /// What the pattern is looking for.
    pub description: String,
}

impl PatternSpec {
    /// Create a pattern spec.
    #[must_use]
    pub fn new(pattern: impl Into<String>, weight: f64, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            weight,
            description: description.into(),
        }
    }
}

/// Either the v2 object form or a legacy bare string.
///
/// An object with an unexpected key matches neither variant.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPattern {
    Weighted(WeightedPattern),
    Bare(String),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WeightedPattern {
    pattern: String,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    description: String,
}

impl From<RawPattern> for PatternSpec {
    fn from(raw: RawPattern) -> Self {
        match raw {
            RawPattern::Weighted(WeightedPattern {
                pattern,
                weight,
                description,
            }) => Self::new(pattern, weight, description),
            RawPattern::Bare(pattern) => Self::new(pattern, DEFAULT_PATTERN_WEIGHT, ""),
        }
    }
}

/// Illustrative example of a definition; informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Example {
    /// Example text.
    pub text: String,
    /// Why the text exhibits the bias or fallacy.
    #[serde(default)]
    pub explanation: String,
}

/// Words or phrases whose proximity to a match shifts confidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextClues {
    /// Clues that raise confidence.
    #[serde(default)]
    pub positive: Vec<String>,
    /// Clues that lower confidence.
    #[serde(default)]
    pub negative: Vec<String>,
}

/// Definition-scoped confidence modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceModifiers {
    /// Terms strongly associated with this particular definition.
    #[serde(default, alias = "biasSpecificTerms")]
    pub bias_specific_terms: Vec<String>,
    /// Terms that signal certainty.
    #[serde(default, alias = "highConfidenceTerms")]
    pub high_confidence_terms: Vec<String>,
    /// Terms that negate a claim when near a match.
    #[serde(default, alias = "negationTerms")]
    pub negation_terms: Vec<String>,
    /// Terms that signal uncertainty.
    #[serde(default, alias = "uncertaintyTerms")]
    pub uncertainty_terms: Vec<String>,
}

/// Process-wide confidence modifiers applied to every definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfidenceModifiers {
    /// Terms that signal certainty.
    #[serde(default, alias = "highConfidenceTerms")]
    pub high_confidence_terms: Vec<String>,
    /// Terms that negate a claim when near a match.
    #[serde(default, alias = "negationTerms")]
    pub negation_terms: Vec<String>,
    /// Terms that signal uncertainty.
    #[serde(default, alias = "uncertaintyTerms")]
    pub uncertainty_terms: Vec<String>,
    /// Hedging phrases.
    #[serde(default, alias = "hedgingTerms")]
    pub hedging_terms: Vec<String>,
}

/// A pattern that vetoes an otherwise valid detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exclusion {
    /// Regular expression source, matched case-insensitively.
    pub pattern: String,
    /// Why a match means the detection is a false positive.
    #[serde(default)]
    pub reason: String,
}

/// One named bias or fallacy entry in the pattern library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BiasOrFallacyDefinition {
    /// Unique name within the category.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Illustrative examples.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Ordered weighted patterns.
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
    /// Optional context clues.
    #[serde(default, alias = "contextClues", skip_serializing_if = "Option::is_none")]
    pub context_clues: Option<ContextClues>,
    /// Optional definition-specific modifiers.
    #[serde(
        default,
        alias = "confidenceModifiers",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence_modifiers: Option<ConfidenceModifiers>,
    /// Optional exclusion patterns.
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl BiasOrFallacyDefinition {
    /// Create a definition with a name, description and patterns.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        patterns: Vec<PatternSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            examples: Vec::new(),
            patterns,
            context_clues: None,
            confidence_modifiers: None,
            exclusions: Vec::new(),
        }
    }

    /// Attach context clues.
    #[must_use]
    pub fn with_context_clues(mut self, clues: ContextClues) -> Self {
        self.context_clues = Some(clues);
        self
    }

    /// Attach definition-specific modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ConfidenceModifiers) -> Self {
        self.confidence_modifiers = Some(modifiers);
        self
    }

    /// Add an exclusion.
    #[must_use]
    pub fn with_exclusion(mut self, pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        self.exclusions.push(Exclusion {
            pattern: pattern.into(),
            reason: reason.into(),
        });
        self
    }
}
