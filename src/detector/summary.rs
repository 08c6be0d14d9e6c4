//! Per-name aggregation of detections.

use super::types::{AnalysisSummary, Detection, SentenceDetection, SummaryEntry};
use crate::patterns::Category;

/// Aggregate sentence detections into per-category summaries.
///
/// Groups by category and name. Each entry carries the instance count, the
/// maximum confidence and the description of the first instance. Lists are
/// sorted by descending count; ties keep first-appearance order.
#[must_use]
pub fn summarize(results: &[SentenceDetection]) -> AnalysisSummary {
    summarize_detections(results.iter().flat_map(|r| r.detections.iter()))
}

/// Aggregate an arbitrary sequence of detections.
#[must_use]
pub fn summarize_detections<'a>(detections: impl IntoIterator<Item = &'a Detection>) -> AnalysisSummary {
    let mut summary = AnalysisSummary::default();

    for detection in detections {
        let bucket = match detection.category {
            Category::Bias => &mut summary.biases_found,
            Category::Fallacy => &mut summary.fallacies_found,
        };
        match bucket.iter_mut().find(|entry| entry.name == detection.name) {
            Some(entry) => {
                entry.count += 1;
                entry.confidence = entry.confidence.max(detection.confidence);
            }
            None => bucket.push(SummaryEntry {
                name: detection.name.clone(),
                description: detection.description.clone(),
                count: 1,
                confidence: detection.confidence,
            }),
        }
    }

    summary.biases_found.sort_by(|a, b| b.count.cmp(&a.count));
    summary.fallacies_found.sort_by(|a, b| b.count.cmp(&a.count));
    summary
}
