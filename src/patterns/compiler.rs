//! Pattern compilation.
//!
//! Raw pattern text is turned into case-insensitive [`Regex`] matchers once,
//! when a detector is constructed, and reused for every sentence.

use regex::{Regex, RegexBuilder};

use super::types::BiasOrFallacyDefinition;
use crate::error::PatternError;

/// A compiled, weighted pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Case-insensitive matcher.
    pub matcher: Regex,
    /// Weight copied from the source pattern.
    pub weight: f64,
    /// Description copied from the source pattern.
    pub description: String,
}

impl CompiledPattern {
    /// The pattern source text.
    #[must_use]
    pub fn pattern_text(&self) -> &str {
        self.matcher.as_str()
    }
}

/// A definition together with its compiled patterns and exclusions.
///
/// `compiled_patterns` has the same length and order as
/// `definition.patterns`.
#[derive(Debug, Clone)]
pub struct CompiledDefinition {
    /// The source definition.
    pub definition: BiasOrFallacyDefinition,
    /// Compiled patterns, in definition order.
    pub compiled_patterns: Vec<CompiledPattern>,
    /// Compiled exclusion matchers, in definition order.
    pub compiled_exclusions: Vec<Regex>,
}

impl CompiledDefinition {
    /// Compile a single definition.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] if any pattern or exclusion
    /// fails to compile.
    pub fn compile(definition: &BiasOrFallacyDefinition) -> Result<Self, PatternError> {
        let compiled_patterns = definition
            .patterns
            .iter()
            .map(|spec| {
                Ok(CompiledPattern {
                    matcher: compile_case_insensitive(&definition.name, &spec.pattern)?,
                    weight: spec.weight,
                    description: spec.description.clone(),
                })
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        let compiled_exclusions = definition
            .exclusions
            .iter()
            .map(|exclusion| compile_case_insensitive(&definition.name, &exclusion.pattern))
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Self {
            definition: definition.clone(),
            compiled_patterns,
            compiled_exclusions,
        })
    }

    /// Name of the underlying definition.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// Compile every definition of one category, preserving order.
///
/// # Errors
///
/// Returns the first [`PatternError::InvalidPattern`] encountered.
pub fn compile_definitions(
    definitions: &[BiasOrFallacyDefinition],
) -> Result<Vec<CompiledDefinition>, PatternError> {
    definitions.iter().map(CompiledDefinition::compile).collect()
}

fn compile_case_insensitive(definition: &str, pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| PatternError::InvalidPattern {
            definition: definition.to_string(),
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::patterns::{PatternLibrary, PatternSpec};

    fn definition(patterns: Vec<PatternSpec>) -> BiasOrFallacyDefinition {
        BiasOrFallacyDefinition::new("Test", "A test definition", patterns)
    }

    #[test]
    fn test_compile_preserves_length_and_order() {
        let defs = vec![
            definition(vec![
                PatternSpec::new("alpha", 0.3, "first"),
                PatternSpec::new("beta", 0.9, "second"),
            ]),
            BiasOrFallacyDefinition::new("Other", "", vec![PatternSpec::new("gamma", 0.5, "")]),
        ];

        let compiled = compile_definitions(&defs).unwrap();

        assert_eq!(compiled.len(), defs.len());
        assert_eq!(compiled[0].name(), "Test");
        assert_eq!(compiled[1].name(), "Other");
        assert_eq!(compiled[0].compiled_patterns.len(), 2);
        assert_eq!(compiled[0].compiled_patterns[0].pattern_text(), "alpha");
        assert_eq!(compiled[0].compiled_patterns[1].pattern_text(), "beta");
        assert!((compiled[0].compiled_patterns[1].weight - 0.9).abs() < f64::EPSILON);
        assert_eq!(compiled[0].compiled_patterns[1].description, "second");
    }

    #[test]
    fn test_compile_empty_pattern_list() {
        let compiled = CompiledDefinition::compile(&definition(vec![])).unwrap();
        assert!(compiled.compiled_patterns.is_empty());
    }

    #[test]
    fn test_compile_is_case_insensitive() {
        let compiled =
            CompiledDefinition::compile(&definition(vec![PatternSpec::new("knew it", 0.5, "")]))
                .unwrap();
        assert!(compiled.compiled_patterns[0].matcher.is_match("I KNEW IT"));
    }

    #[test]
    fn test_compile_malformed_pattern_fails() {
        let result =
            CompiledDefinition::compile(&definition(vec![PatternSpec::new("(unclosed", 0.5, "")]));
        assert!(matches!(
            result,
            Err(PatternError::InvalidPattern { definition, pattern, .. })
                if definition == "Test" && pattern == "(unclosed"
        ));
    }

    #[test]
    fn test_compile_malformed_exclusion_fails() {
        let def = definition(vec![PatternSpec::new("ok", 0.5, "")]).with_exclusion("[z-a]", "bad");
        assert!(matches!(
            CompiledDefinition::compile(&def),
            Err(PatternError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_standard_library_compiles() {
        let library = PatternLibrary::standard().unwrap();
        let biases = compile_definitions(&library.biases).unwrap();
        let fallacies = compile_definitions(&library.fallacies).unwrap();
        assert_eq!(biases.len(), library.biases.len());
        assert_eq!(fallacies.len(), library.fallacies.len());
        for (compiled, source) in biases.iter().zip(&library.biases) {
            assert_eq!(compiled.compiled_patterns.len(), source.patterns.len());
        }
    }
}
