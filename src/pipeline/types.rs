//! Pipeline data model.
//!
//! Types exchanged between the pipeline and its collaborators, and the
//! shape of the final report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::{AnalysisSummary, Detection};
use crate::patterns::Category;

/// Which branch produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDetector {
    /// Regex-driven engine only.
    RuleBased,
    /// LLM subtle-bias detector only.
    Llm,
    /// Found by both branches.
    Both,
}

/// A bias or fallacy reported by the LLM detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtleDetection {
    /// The sentence the finding refers to.
    pub sentence: String,
    /// Index of that sentence in the splitter output.
    pub sentence_index: usize,
    /// Bias or fallacy name.
    pub name: String,
    /// Bias or fallacy.
    pub category: Category,
    /// Exact quote supporting the finding.
    pub quoted_text: String,
    /// Model reasoning.
    pub reasoning: String,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// True if the issue is implicit rather than overt.
    pub is_subtle: bool,
}

/// A merged, not yet validated detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDetection {
    /// Core detection fields.
    #[serde(flatten)]
    pub detection: Detection,
    /// Sentence text.
    pub sentence: String,
    /// Sentence index.
    pub sentence_index: usize,
    /// Originating branch.
    pub source_detector: SourceDetector,
    /// Supporting quote from the LLM, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_text: Option<String>,
    /// LLM reasoning, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Flagged as subtle by the LLM.
    #[serde(default)]
    pub is_subtle: bool,
}

impl CandidateDetection {
    /// Returns true if `subtle` refers to the same sentence, category and
    /// (case-insensitive) name.
    #[must_use]
    pub fn matches_subtle(&self, subtle: &SubtleDetection) -> bool {
        self.sentence_index == subtle.sentence_index
            && self.detection.category == subtle.category
            && self.detection.name.eq_ignore_ascii_case(&subtle.name)
    }
}

/// A candidate after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedDetection {
    /// Core detection fields.
    #[serde(flatten)]
    pub detection: Detection,
    /// Sentence text.
    pub sentence: String,
    /// Sentence index.
    pub sentence_index: usize,
    /// Originating branch.
    pub source_detector: SourceDetector,
    /// Whether the validator accepted the candidate.
    pub is_validated: bool,
    /// Validator score in `[0, 1]`.
    pub validation_score: f64,
    /// Validator reasoning.
    pub validation_reasoning: String,
    /// Supporting quote, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_text: Option<String>,
}

impl ValidatedDetection {
    /// Build a validated record from a candidate and a verdict.
    #[must_use]
    pub fn from_candidate(
        candidate: CandidateDetection,
        is_validated: bool,
        validation_score: f64,
        validation_reasoning: impl Into<String>,
    ) -> Self {
        Self {
            detection: candidate.detection,
            sentence: candidate.sentence,
            sentence_index: candidate.sentence_index,
            source_detector: candidate.source_detector,
            is_validated,
            validation_score,
            validation_reasoning: validation_reasoning.into(),
            quoted_text: candidate.quoted_text,
        }
    }

    /// Detection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.detection.name
    }

    /// Detection confidence.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.detection.confidence
    }
}

/// Plain-language explanation of one bias or fallacy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// One or two sentence definition.
    pub simple_explanation: String,
    /// Why it weakens the argument.
    pub why_problematic: String,
    /// How it shows up in this text.
    pub in_context: String,
    /// A more neutral rewording, if the model offered one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_framing: Option<String>,
}

/// An explanation keyed by detection name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedExplanation {
    /// Detection name.
    pub name: String,
    /// The explanation.
    #[serde(flatten)]
    pub explanation: Explanation,
}

/// Explanations ordered by first appearance of each name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Explanations(Vec<NamedExplanation>);

impl Explanations {
    /// Append an explanation, replacing any existing entry of the same name.
    pub fn insert(&mut self, name: impl Into<String>, explanation: Explanation) {
        let name = name.into();
        if let Some(entry) = self.0.iter_mut().find(|e| e.name == name) {
            entry.explanation = explanation;
        } else {
            self.0.push(NamedExplanation { name, explanation });
        }
    }

    /// Look up an explanation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Explanation> {
        self.0
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.explanation)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedExplanation> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Optional information about the analyzed article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    /// Headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publication or site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Byline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Emotionally loaded language found in the article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalLanguage {
    /// Intensity in `[0, 1]`.
    pub score: f64,
    /// Example phrases.
    pub examples: Vec<String>,
}

/// Assessment of the article's sourcing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCredibility {
    /// Short verdict.
    pub assessment: String,
    /// Factors behind the verdict.
    pub factors: Vec<String>,
}

/// Article-level framing analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    /// Overall tone, e.g. `neutral` or `alarmist`.
    pub overall_tone: String,
    /// Confidence in the tone label, `[0, 1]`.
    pub confidence_in_tone: f64,
    /// Apparent purpose of the article.
    pub primary_intent: String,
    /// Credibility in `[0, 10]`.
    pub credibility_score: f64,
    /// Persuasion techniques observed.
    pub manipulation_techniques: Vec<String>,
    /// Viewpoints the article leaves out.
    pub omitted_perspectives: Vec<String>,
    /// Framing label, e.g. `balanced`.
    pub framing_category: String,
    /// Emotional language.
    pub emotional_language: EmotionalLanguage,
    /// Sourcing assessment.
    pub source_credibility: SourceCredibility,
}

/// Credibility assigned when no analysis is available.
pub const NEUTRAL_CREDIBILITY: f64 = 5.0;

impl ArticleAnalysis {
    /// Analysis used when the framing analyzer is unavailable.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            overall_tone: "neutral".to_string(),
            confidence_in_tone: 0.0,
            primary_intent: "unknown".to_string(),
            credibility_score: NEUTRAL_CREDIBILITY,
            manipulation_techniques: Vec::new(),
            omitted_perspectives: Vec::new(),
            framing_category: "unknown".to_string(),
            emotional_language: EmotionalLanguage::default(),
            source_credibility: SourceCredibility {
                assessment: "unknown".to_string(),
                factors: Vec::new(),
            },
        }
    }
}

impl Default for ArticleAnalysis {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Highlight severity derived from confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Below 0.6.
    Low,
    /// 0.6 up to 0.8.
    Medium,
    /// 0.8 and above.
    High,
}

impl Severity {
    /// Classify a confidence value.
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A span of the input text to highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedSegment {
    /// Character offset of the segment start.
    pub start: usize,
    /// Character offset one past the segment end.
    pub end: usize,
    /// Highlighted text.
    pub text: String,
    /// Detection name.
    pub name: String,
    /// Bias or fallacy.
    pub category: Category,
    /// Severity.
    pub severity: Severity,
    /// Detection confidence.
    pub confidence: f64,
}

/// A collaborator stage that can fall back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// LLM subtle-bias detection.
    LlmDetect,
    /// Validation.
    Validate,
    /// Explanation generation.
    Explain,
    /// Framing analysis.
    AnalyzeFraming,
}

impl Stage {
    /// Stable identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LlmDetect => "llm_detect",
            Self::Validate => "validate",
            Self::Explain => "explain",
            Self::AnalyzeFraming => "analyze_framing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping about one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Unique id of the run.
    pub analysis_id: uuid::Uuid,
    /// Completion time.
    pub generated_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub processing_ms: u64,
    /// Number of sentences analyzed.
    pub sentence_count: usize,
    /// Stages that fell back, in the order they did so.
    pub fallbacks_used: Vec<Stage>,
}

/// The report returned by [`AnalysisPipeline::analyze`](super::AnalysisPipeline::analyze).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalOutput {
    /// Validated detections.
    pub detections: Vec<ValidatedDetection>,
    /// Explanations by name.
    pub explanations: Explanations,
    /// Highlights sorted by start offset.
    pub highlighted_segments: Vec<HighlightedSegment>,
    /// Counts per name.
    pub summary: AnalysisSummary,
    /// One-line natural-language summary.
    pub summary_text: String,
    /// Article-level framing.
    pub article_analysis: ArticleAnalysis,
    /// Run metadata.
    pub metadata: ReportMetadata,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn detection(name: &str) -> Detection {
        Detection {
            category: Category::Bias,
            name: name.to_string(),
            description: "desc".to_string(),
            matches: vec![],
            confidence: 0.7,
        }
    }

    fn candidate() -> CandidateDetection {
        CandidateDetection {
            detection: detection("Anchoring Bias"),
            sentence: "s".to_string(),
            sentence_index: 2,
            source_detector: SourceDetector::RuleBased,
            quoted_text: None,
            reasoning: None,
            is_subtle: false,
        }
    }

    #[test_case(0.95, Severity::High)]
    #[test_case(0.8, Severity::High)]
    #[test_case(0.79, Severity::Medium)]
    #[test_case(0.6, Severity::Medium)]
    #[test_case(0.59, Severity::Low)]
    #[test_case(0.1, Severity::Low)]
    fn test_severity_thresholds(confidence: f64, expected: Severity) {
        assert_eq!(Severity::from_confidence(confidence), expected);
    }

    #[test]
    fn test_source_detector_serialization() {
        assert_eq!(
            serde_json::to_string(&SourceDetector::RuleBased).unwrap(),
            "\"rule_based\""
        );
        assert_eq!(serde_json::to_string(&SourceDetector::Both).unwrap(), "\"both\"");
    }

    #[test]
    fn test_candidate_matches_subtle_case_insensitive() {
        let subtle = SubtleDetection {
            sentence: "s".to_string(),
            sentence_index: 2,
            name: "anchoring bias".to_string(),
            category: Category::Bias,
            quoted_text: String::new(),
            reasoning: String::new(),
            confidence: 0.5,
            is_subtle: true,
        };
        assert!(candidate().matches_subtle(&subtle));

        let other_sentence = SubtleDetection {
            sentence_index: 3,
            ..subtle.clone()
        };
        assert!(!candidate().matches_subtle(&other_sentence));

        let other_category = SubtleDetection {
            category: Category::Fallacy,
            ..subtle
        };
        assert!(!candidate().matches_subtle(&other_category));
    }

    #[test]
    fn test_validated_flattens_detection() {
        let validated = ValidatedDetection::from_candidate(candidate(), true, 0.9, "ok");
        let json = serde_json::to_value(&validated).unwrap();
        assert_eq!(json["name"], "Anchoring Bias");
        assert_eq!(json["category"], "bias");
        assert_eq!(json["source_detector"], "rule_based");
        assert_eq!(json["validation_score"], 0.9);
        assert!(json.get("quoted_text").is_none());
        assert_eq!(validated.name(), "Anchoring Bias");
        assert_eq!(validated.confidence(), 0.7);
    }

    #[test]
    fn test_explanations_keep_insertion_order() {
        let explanation = |s: &str| Explanation {
            simple_explanation: s.to_string(),
            why_problematic: String::new(),
            in_context: String::new(),
            alternative_framing: None,
        };
        let mut explanations = Explanations::default();
        explanations.insert("Zeta", explanation("z"));
        explanations.insert("Alpha", explanation("a"));
        explanations.insert("Zeta", explanation("z2"));

        let names: Vec<_> = explanations.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(explanations.get("Zeta").unwrap().simple_explanation, "z2");
        assert_eq!(explanations.len(), 2);

        let json = serde_json::to_value(&explanations).unwrap();
        assert_eq!(json[0]["name"], "Zeta");
        assert_eq!(json[1]["simple_explanation"], "a");
    }

    #[test]
    fn test_neutral_analysis() {
        let analysis = ArticleAnalysis::neutral();
        assert_eq!(analysis.overall_tone, "neutral");
        assert_eq!(analysis.credibility_score, NEUTRAL_CREDIBILITY);
        assert!(analysis.manipulation_techniques.is_empty());
        assert_eq!(ArticleAnalysis::default(), analysis);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::AnalyzeFraming.to_string(), "analyze_framing");
        assert_eq!(
            serde_json::to_string(&Stage::LlmDetect).unwrap(),
            "\"llm_detect\""
        );
    }
}
