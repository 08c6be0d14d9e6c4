//! Rule-based detection benchmarks.
//!
//! Benchmarks: single sentence scoring, whole-text detection and text cleaning.
//! Run with: cargo bench --bench detector_benchmarks

#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use bias_lens::detector::BiasDetector;
use bias_lens::patterns::CategoryFilter;
use bias_lens::text::{clean_text, PreprocessOptions, PunctuationSplitter};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const PARAGRAPH: &str = "I knew this would happen with the new policy. \
    Everyone is switching to the new plan, so you should too. \
    Critics of the plan are just jealous of its success. \
    The weather was mild and the meeting ended early. \
    It was obvious all along that the market would collapse. ";

fn article(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn detect_sentence(c: &mut Criterion) {
    let detector = BiasDetector::standard().unwrap();
    c.bench_function("detect_in_sentence", |b| {
        b.iter(|| {
            detector.detect_in_sentence(
                black_box("I definitely knew this would happen, it was obvious all along."),
                CategoryFilter::All,
            )
        });
    });
}

fn detect_text(c: &mut Criterion) {
    let detector = BiasDetector::standard().unwrap();
    let splitter = PunctuationSplitter::default();
    let mut group = c.benchmark_group("detect_in_text");

    for paragraphs in [1, 10, 100] {
        let text = article(paragraphs);
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &text, |b, text| {
            b.iter(|| detector.detect_in_text(black_box(text), &splitter));
        });
    }
    group.finish();
}

fn clean(c: &mut Criterion) {
    let text = format!("{} See https://example.com/report for details.", article(10));
    let options = PreprocessOptions::default();
    c.bench_function("clean_text", |b| {
        b.iter(|| clean_text(black_box(&text), &options));
    });
}

criterion_group!(benches, detect_sentence, detect_text, clean);
criterion_main!(benches);
