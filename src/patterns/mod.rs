//! Pattern library.
//!
//! This module provides:
//! - The definition data model ([`BiasOrFallacyDefinition`], [`PatternSpec`], modifiers)
//! - Versioned JSON loading and validation ([`PatternLibrary`])
//! - The built-in standard library ([`PatternLibrary::standard`])
//! - Compilation into case-insensitive matchers ([`compile_definitions`])
//!
//! # Example
//!
//! ```
//! use bias_lens::patterns::{compile_definitions, PatternLibrary};
//!
//! let library = PatternLibrary::standard().unwrap();
//! let compiled = compile_definitions(&library.biases).unwrap();
//! assert_eq!(compiled.len(), library.biases.len());
//! ```

mod compiler;
mod library;
mod types;

pub use compiler::{compile_definitions, CompiledDefinition, CompiledPattern};
pub use library::{PatternLibrary, CURRENT_SCHEMA_VERSION};
pub use types::{
    BiasOrFallacyDefinition, Category, CategoryFilter, ConfidenceModifiers, ContextClues,
    Example, Exclusion, GlobalConfidenceModifiers, PatternSpec, DEFAULT_PATTERN_WEIGHT,
};
