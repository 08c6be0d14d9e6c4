//! Prompt templates.
//!
//! Each LLM stage has a static system prompt describing the exact JSON
//! shape expected back, and a builder that renders the per-call user
//! message.
//!
//! # Example
//!
//! ```
//! use bias_lens::prompts::{subtle_detection_system_prompt, subtle_detection_user_message};
//!
//! let message = subtle_detection_user_message(
//!     "Everyone agrees. It must be true.",
//!     &["Everyone agrees.".to_string(), "It must be true.".to_string()],
//!     &[],
//! );
//! assert!(message.contains("[1] It must be true."));
//! assert!(subtle_detection_system_prompt().contains("sentence_index"));
//! ```

#![allow(clippy::missing_const_for_fn)]

use std::fmt::Write as _;

use crate::detector::SentenceDetection;
use crate::pipeline::{ArticleMetadata, CandidateDetection, ValidatedDetection};

/// Article text longer than this is truncated inside prompts.
pub const MAX_PROMPT_TEXT_CHARS: usize = 12_000;

/// System prompt for the subtle-bias detector.
#[must_use]
pub fn subtle_detection_system_prompt() -> &'static str {
    r#"You are an expert in cognitive psychology and informal logic. You review
news and opinion writing for cognitive biases and logical fallacies that
keyword rules miss: implicit framing, selective emphasis, loaded
presuppositions, insinuation.

Respond with a JSON object in this exact format:
{
  "detections": [
    {
      "sentence_index": 0,
      "name": "Name of the bias or fallacy (e.g., Anchoring Bias, Straw Man)",
      "category": "bias|fallacy",
      "quoted_text": "Exact words from the sentence",
      "reasoning": "Why this passage exhibits the issue",
      "confidence": 0.7,
      "is_subtle": true
    }
  ]
}

Important:
- sentence_index refers to the numbered sentences you are given
- Do not repeat issues already listed as found by the rule-based pass
- Only report issues with clear textual evidence
- Return {"detections": []} if nothing qualifies"#
}

/// User message for the subtle-bias detector.
#[must_use]
pub fn subtle_detection_user_message(
    text: &str,
    sentences: &[String],
    rule_based: &[SentenceDetection],
) -> String {
    let mut message = format!("Article:\n{}\n\nSentences:\n", truncate(text));
    for (index, sentence) in sentences.iter().enumerate() {
        let _ = writeln!(message, "[{index}] {sentence}");
    }

    if !rule_based.is_empty() {
        message.push_str("\nAlready found by the rule-based pass:\n");
        for result in rule_based {
            for detection in &result.detections {
                let _ = writeln!(
                    message,
                    "- [{}] {} ({})",
                    result.sentence_index, detection.name, detection.category
                );
            }
        }
    }
    message
}

/// System prompt for the validator.
#[must_use]
pub fn validation_system_prompt() -> &'static str {
    r#"You are a careful reviewer checking candidate bias and fallacy
detections for false positives. A candidate is valid only if the quoted
sentence, read in the context of the full article, genuinely exhibits the
named issue. Quoting or reporting someone else's biased claim is not itself
biased.

Respond with a JSON object in this exact format:
{
  "validations": [
    {
      "index": 0,
      "is_valid": true,
      "score": 0.8,
      "reasoning": "Short justification"
    }
  ]
}

Important:
- index refers to the numbered candidates you are given
- Return exactly one entry per candidate
- score is your confidence in [0, 1] that the candidate is a true positive"#
}

/// User message for the validator.
#[must_use]
pub fn validation_user_message(candidates: &[CandidateDetection], text: &str) -> String {
    let mut message = format!("Article:\n{}\n\nCandidates:\n", truncate(text));
    for (index, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            message,
            "[{index}] {} ({}), confidence {:.2}\n    sentence: {}",
            candidate.detection.name,
            candidate.detection.category,
            candidate.detection.confidence,
            candidate.sentence
        );
        if let Some(reasoning) = &candidate.reasoning {
            let _ = writeln!(message, "    detector reasoning: {reasoning}");
        }
    }
    message
}

/// System prompt for the explanation generator.
#[must_use]
pub fn explanation_system_prompt() -> &'static str {
    r#"You explain cognitive biases and logical fallacies to general readers
in plain, non-technical language.

Respond with a JSON object in this exact format:
{
  "simple_explanation": "One or two sentences defining the issue",
  "why_problematic": "Why it weakens the argument or misleads the reader",
  "in_context": "How it shows up in the quoted sentence",
  "alternative_framing": "A more neutral way to say the same thing"
}

Important:
- Keep each field under 60 words
- alternative_framing may be omitted if no rewording makes sense"#
}

/// User message for the explanation generator.
#[must_use]
pub fn explanation_user_message(detection: &ValidatedDetection) -> String {
    let mut message = format!(
        "Issue: {} ({})\nDefinition: {}\nSentence: {}\n",
        detection.detection.name,
        detection.detection.category,
        detection.detection.description,
        detection.sentence
    );
    if let Some(quote) = &detection.quoted_text {
        let _ = writeln!(message, "Quoted text: {quote}");
    }
    message
}

/// System prompt for the framing analyzer.
#[must_use]
pub fn framing_system_prompt() -> &'static str {
    r#"You are a media literacy analyst. Assess how the article as a whole
frames its subject.

Respond with a JSON object in this exact format:
{
  "overall_tone": "neutral|positive|negative|alarmist|persuasive|...",
  "confidence_in_tone": 0.8,
  "primary_intent": "inform|persuade|entertain|provoke|...",
  "credibility_score": 6.5,
  "manipulation_techniques": ["technique", "..."],
  "omitted_perspectives": ["perspective", "..."],
  "framing_category": "balanced|one-sided|sensationalized|...",
  "emotional_language": {"score": 0.4, "examples": ["phrase"]},
  "source_credibility": {"assessment": "Short verdict", "factors": ["factor"]}
}

Important:
- credibility_score is on a 0 to 10 scale
- Base the assessment on the text; metadata is context only"#
}

/// User message for the framing analyzer.
#[must_use]
pub fn framing_user_message(
    text: &str,
    metadata: Option<&ArticleMetadata>,
    detections: &[ValidatedDetection],
) -> String {
    let mut message = String::new();
    if let Some(meta) = metadata {
        for (label, value) in [
            ("Title", meta.title.as_deref()),
            ("Source", meta.source.as_deref()),
            ("Author", meta.author.as_deref()),
        ] {
            if let Some(value) = value {
                let _ = writeln!(message, "{label}: {value}");
            }
        }
        if let Some(published) = meta.published_at {
            let _ = writeln!(message, "Published: {}", published.to_rfc3339());
        }
        message.push('\n');
    }

    let _ = write!(message, "Article:\n{}\n", truncate(text));

    if !detections.is_empty() {
        message.push_str("\nConfirmed issues:\n");
        for detection in detections {
            let _ = writeln!(
                message,
                "- {} ({}): {}",
                detection.detection.name, detection.detection.category, detection.sentence
            );
        }
    }
    message
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_PROMPT_TEXT_CHARS) {
        Some((cut, _)) => format!("{}\n[truncated]", &text[..cut]),
        None => text.to_string(),
    }
}
