//! Detection pipeline.
//!
//! Sequences the rule-based engine against the LLM-backed collaborators:
//!
//! ```text
//! Preprocess -> { RuleBasedDetect || LlmDetect } -> Merge -> Validate
//!            -> Explain -> AnalyzeFraming -> FormatOutput
//! ```
//!
//! Each collaborator call runs under a timeout. A failed or timed-out call is
//! logged, recorded in [`ReportMetadata::fallbacks_used`] and replaced by a
//! local fallback, so [`AnalysisPipeline::analyze`] only fails on invalid
//! input.

mod fallback;
mod format;
mod merge;
mod types;

pub use fallback::{auto_validate, fallback_explanation, AUTO_VALIDATED_REASONING, GENERIC_CAVEAT};
pub use format::{highlight_segments, summary_text};
pub use merge::merge_candidates;
pub use types::{
    ArticleAnalysis, ArticleMetadata, CandidateDetection, EmotionalLanguage, Explanation,
    Explanations, FinalOutput, HighlightedSegment, NamedExplanation, ReportMetadata, Severity,
    SourceCredibility, SourceDetector, Stage, SubtleDetection, ValidatedDetection,
    NEUTRAL_CREDIBILITY,
};

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::detector::{summarize_detections, BiasDetector, SentenceDetection};
use crate::error::{AnalysisError, StageError};
use crate::stages::{LlmExplainer, LlmFramingAnalyzer, LlmSubtleDetector, LlmValidator};
use crate::text::{clean_text, PreprocessOptions, PunctuationSplitter};
use crate::traits::{
    AnthropicClientTrait, DetectionValidator, ExplanationGenerator, FramingAnalyzer,
    RealTimeProvider, SentenceSplitter, SubtleBiasDetector, TimeProvider,
};

/// Longest accepted input, in characters.
pub const MAX_TEXT_CHARS: usize = 100_000;

/// Default per-collaborator timeout.
pub const DEFAULT_STAGE_TIMEOUT_MS: u64 = 60_000;

/// Default confidence needed to pass validation without a validator.
pub const DEFAULT_VALIDATION_THRESHOLD: f64 = 0.65;

/// Pipeline tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Timeout applied to every collaborator call.
    pub stage_timeout: Duration,
    /// Threshold for the validation fallback.
    pub validation_threshold: f64,
    /// Text cleaning options.
    pub preprocess: PreprocessOptions,
    /// Longest accepted input, in characters.
    pub max_text_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_millis(DEFAULT_STAGE_TIMEOUT_MS),
            validation_threshold: DEFAULT_VALIDATION_THRESHOLD,
            preprocess: PreprocessOptions::default(),
            max_text_chars: MAX_TEXT_CHARS,
        }
    }
}

impl PipelineConfig {
    /// Set the collaborator timeout.
    #[must_use]
    pub const fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Set the validation fallback threshold.
    #[must_use]
    pub const fn with_validation_threshold(mut self, threshold: f64) -> Self {
        self.validation_threshold = threshold;
        self
    }

    /// Set the preprocessing options.
    #[must_use]
    pub const fn with_preprocess(mut self, preprocess: PreprocessOptions) -> Self {
        self.preprocess = preprocess;
        self
    }
}

/// The four LLM-backed collaborators.
#[derive(Clone)]
pub struct Collaborators {
    /// Subtle bias detection.
    pub subtle: Arc<dyn SubtleBiasDetector>,
    /// Candidate validation.
    pub validator: Arc<dyn DetectionValidator>,
    /// Explanation generation.
    pub explainer: Arc<dyn ExplanationGenerator>,
    /// Framing analysis.
    pub framing: Arc<dyn FramingAnalyzer>,
}

impl Collaborators {
    /// Build every collaborator on top of one completion client.
    #[must_use]
    pub fn from_client<C>(client: C) -> Self
    where
        C: AnthropicClientTrait + Clone + 'static,
    {
        Self {
            subtle: Arc::new(LlmSubtleDetector::new(client.clone())),
            validator: Arc::new(LlmValidator::new(client.clone())),
            explainer: Arc::new(LlmExplainer::new(client.clone())),
            framing: Arc::new(LlmFramingAnalyzer::new(client)),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Hybrid rule-based and LLM analysis of one text at a time.
///
/// Cheap to share: every component sits behind an `Arc`, and a single
/// pipeline can serve concurrent [`analyze`](Self::analyze) calls.
#[derive(Clone)]
pub struct AnalysisPipeline {
    detector: Arc<BiasDetector>,
    splitter: Arc<dyn SentenceSplitter>,
    collaborators: Collaborators,
    time_provider: Arc<dyn TimeProvider>,
    config: PipelineConfig,
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnalysisPipeline {
    /// Create a pipeline with the default splitter and system clock.
    #[must_use]
    pub fn new(detector: Arc<BiasDetector>, collaborators: Collaborators, config: PipelineConfig) -> Self {
        Self {
            detector,
            splitter: Arc::new(PunctuationSplitter::default()),
            collaborators,
            time_provider: Arc::new(RealTimeProvider),
            config,
        }
    }

    /// Replace the sentence splitter.
    #[must_use]
    pub fn with_splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Replace the clock used for report timestamps.
    #[must_use]
    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze `text` and produce a report.
    ///
    /// Rule-based and LLM detection run concurrently, so the subtle detector
    /// is always handed an empty rule-based list. Its prompt never lists
    /// earlier findings; duplicates are reconciled by [`merge_candidates`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyText`] for empty or whitespace-only
    /// input and [`AnalysisError::TextTooLong`] when the input exceeds the
    /// configured limit. Collaborator failures never surface here.
    pub async fn analyze(
        &self,
        text: &str,
        metadata: Option<ArticleMetadata>,
    ) -> Result<FinalOutput, AnalysisError> {
        let started = Instant::now();
        self.check_input(text)?;

        let cleaned = clean_text(text, &self.config.preprocess);
        let sentences = self.splitter.split(&cleaned);
        debug!(
            input_chars = text.chars().count(),
            sentences = sentences.len(),
            "Preprocessed input"
        );

        let mut fallbacks = Vec::new();

        let (rule_based, subtle) = tokio::join!(
            self.detect_rule_based(&sentences),
            self.guarded(
                Stage::LlmDetect,
                self.collaborators.subtle.detect(&cleaned, &sentences, &[])
            )
        );
        let subtle = subtle.unwrap_or_else(|_| {
            record(&mut fallbacks, Stage::LlmDetect);
            Vec::new()
        });

        let candidates = merge_candidates(&self.detector, rule_based, subtle);
        let detections = self.validate(candidates, &cleaned, &mut fallbacks).await;
        let explanations = self.explain(&detections, &mut fallbacks).await;

        let article_analysis = self
            .guarded(
                Stage::AnalyzeFraming,
                self.collaborators
                    .framing
                    .analyze(&cleaned, metadata, &detections),
            )
            .await
            .unwrap_or_else(|_| {
                record(&mut fallbacks, Stage::AnalyzeFraming);
                ArticleAnalysis::neutral()
            });

        let summary = summarize_detections(detections.iter().map(|d| &d.detection));
        let output = FinalOutput {
            highlighted_segments: highlight_segments(text, &detections),
            summary_text: summary_text(&summary, sentences.len()),
            summary,
            explanations,
            article_analysis,
            metadata: ReportMetadata {
                analysis_id: uuid::Uuid::new_v4(),
                generated_at: self.time_provider.now(),
                processing_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                sentence_count: sentences.len(),
                fallbacks_used: fallbacks,
            },
            detections,
        };

        info!(
            analysis_id = %output.metadata.analysis_id,
            detections = output.detections.len(),
            fallbacks = output.metadata.fallbacks_used.len(),
            elapsed_ms = output.metadata.processing_ms,
            "Analysis complete"
        );
        Ok(output)
    }

    fn check_input(&self, text: &str) -> Result<(), AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyText);
        }
        let length = text.chars().count();
        if length > self.config.max_text_chars {
            return Err(AnalysisError::TextTooLong {
                length,
                max: self.config.max_text_chars,
            });
        }
        Ok(())
    }

    async fn detect_rule_based(&self, sentences: &[String]) -> Vec<SentenceDetection> {
        let detector = Arc::clone(&self.detector);
        let owned = sentences.to_vec();
        match tokio::task::spawn_blocking(move || detector.detect_in_sentences(&owned)).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Rule-based detection task failed");
                Vec::new()
            }
        }
    }

    async fn validate(
        &self,
        candidates: Vec<CandidateDetection>,
        text: &str,
        fallbacks: &mut Vec<Stage>,
    ) -> Vec<ValidatedDetection> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let verdicts = self
            .guarded(
                Stage::Validate,
                self.collaborators.validator.validate(&candidates, text),
            )
            .await;
        let validated = match verdicts {
            Ok(verdicts) => verdicts.into_iter().filter(|d| d.is_validated).collect(),
            Err(_) => {
                record(fallbacks, Stage::Validate);
                auto_validate(candidates, self.config.validation_threshold)
            }
        };
        debug!(validated = validated.len(), "Validation complete");
        validated
    }

    async fn explain(
        &self,
        detections: &[ValidatedDetection],
        fallbacks: &mut Vec<Stage>,
    ) -> Explanations {
        let mut seen = HashSet::new();
        let firsts: Vec<&ValidatedDetection> = detections
            .iter()
            .filter(|d| seen.insert(d.name()))
            .collect();

        let results = join_all(firsts.iter().map(|detection| {
            self.guarded(Stage::Explain, self.collaborators.explainer.explain(detection))
        }))
        .await;

        let mut explanations = Explanations::default();
        for (detection, result) in firsts.into_iter().zip(results) {
            let explanation = result.unwrap_or_else(|_| {
                record(fallbacks, Stage::Explain);
                let description = self
                    .detector
                    .definition(detection.detection.category, detection.name())
                    .map_or(detection.detection.description.as_str(), |d| {
                        d.description.as_str()
                    });
                fallback_explanation(description, detection)
            });
            explanations.insert(detection.name(), explanation);
        }
        explanations
    }

    /// Run one collaborator call under the stage timeout, logging failures.
    async fn guarded<T, F>(&self, stage: Stage, call: F) -> Result<T, StageError>
    where
        F: Future<Output = Result<T, StageError>> + Send,
    {
        let result = tokio::time::timeout(self.config.stage_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(StageError::Timeout {
                    elapsed_ms: u64::try_from(self.config.stage_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                })
            });
        if let Err(e) = &result {
            warn!(stage = %stage, error = %e, "Stage failed, using fallback");
        }
        result
    }
}

fn record(fallbacks: &mut Vec<Stage>, stage: Stage) {
    if !fallbacks.contains(&stage) {
        fallbacks.push(stage);
    }
}
