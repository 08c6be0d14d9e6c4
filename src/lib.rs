//! bias-lens
//!
//! Hybrid detection of cognitive biases and logical fallacies in prose.
//!
//! A deterministic, regex-driven engine scores every sentence against a
//! pattern library. An LLM pass looks for what surface patterns miss,
//! validates the merged candidates, explains them in plain language and
//! assesses the article's framing. Every LLM stage degrades to a local
//! fallback, so a report is always produced.
//!
//! # Features
//!
//! - Versioned JSON pattern libraries with a built-in standard library
//! - Multi-layer confidence scoring with proximity-gated modifiers
//! - Concurrent rule-based and LLM detection
//! - Direct Anthropic API integration with retry and backoff
//! - Character-offset highlights and per-name summaries
//!
//! # Quick Start
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-ant-xxx ./bias-lens < article.txt
//! ```
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────┐
//! stdin ───▶ │  Preprocess  │
//!            └──────┬───────┘
//!          ┌────────┴────────┐
//!          ▼                 ▼
//!   ┌─────────────┐   ┌─────────────┐
//!   │ BiasDetector│   │  LLM detect │──────▶ Anthropic API
//!   └──────┬──────┘   └──────┬──────┘
//!          └────────┬────────┘
//!                   ▼
//!      Merge → Validate → Explain → Framing ──▶ Anthropic API
//!                   │
//!                   ▼
//!           FinalOutput (JSON) ───▶ stdout
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anthropic;
pub mod config;
pub mod detector;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod prompts;
pub mod stages;
pub mod text;
pub mod traits;

#[cfg(test)]
mod test_utils;
