//! Pattern library loading and validation.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{BiasOrFallacyDefinition, Category, GlobalConfidenceModifiers};
use crate::error::PatternError;

/// Highest library schema version understood by this crate.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Built-in library shipped with the crate.
const STANDARD_LIBRARY_JSON: &str = include_str!("standard_library.json");

const fn legacy_version() -> u32 {
    1
}

/// The catalogue of bias and fallacy definitions plus global modifiers.
///
/// Loaded once at process start and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternLibrary {
    /// Schema version; documents without one are treated as v1.
    #[serde(default = "legacy_version")]
    pub version: u32,
    /// Cognitive bias definitions.
    #[serde(default)]
    pub biases: Vec<BiasOrFallacyDefinition>,
    /// Logical fallacy definitions.
    #[serde(default)]
    pub fallacies: Vec<BiasOrFallacyDefinition>,
    /// Modifiers applied to every definition.
    #[serde(default, alias = "globalModifiers")]
    pub global_modifiers: GlobalConfidenceModifiers,
}

impl PatternLibrary {
    /// Build a library from parts and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a name is empty or duplicated, or a weight
    /// is outside `[0, 1]`.
    pub fn new(
        biases: Vec<BiasOrFallacyDefinition>,
        fallacies: Vec<BiasOrFallacyDefinition>,
        global_modifiers: GlobalConfidenceModifiers,
    ) -> Result<Self, PatternError> {
        let library = Self {
            version: CURRENT_SCHEMA_VERSION,
            biases,
            fallacies,
            global_modifiers,
        };
        library.validate()?;
        Ok(library)
    }

    /// The built-in standard library.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Malformed`] only if the embedded document is
    /// corrupt, which the test suite guards against.
    pub fn standard() -> Result<Self, PatternError> {
        Self::from_json_str(STANDARD_LIBRARY_JSON)
    }

    /// Parse and validate a library document.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Malformed`] for invalid JSON or unknown
    /// fields, and the errors of [`PatternLibrary::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, PatternError> {
        let library: Self = serde_json::from_str(json).map_err(|e| PatternError::Malformed {
            message: e.to_string(),
        })?;
        library.validate()?;
        tracing::debug!(
            version = library.version,
            biases = library.biases.len(),
            fallacies = library.fallacies.len(),
            "Pattern library loaded"
        );
        Ok(library)
    }

    /// Read, parse and validate a library file.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Io`] if the file cannot be read, plus the
    /// errors of [`PatternLibrary::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PatternError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Check version, names and weights.
    ///
    /// Pattern syntax is checked later, when the library is compiled.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] found.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.version == 0 || self.version > CURRENT_SCHEMA_VERSION {
            return Err(PatternError::UnsupportedVersion {
                version: self.version,
                max: CURRENT_SCHEMA_VERSION,
            });
        }
        validate_definitions(Category::Bias, &self.biases)?;
        validate_definitions(Category::Fallacy, &self.fallacies)
    }

    /// Definitions of one category, in library order.
    #[must_use]
    pub fn definitions(&self, category: Category) -> &[BiasOrFallacyDefinition] {
        match category {
            Category::Bias => &self.biases,
            Category::Fallacy => &self.fallacies,
        }
    }

    /// Look up a definition by name (case-insensitive).
    #[must_use]
    pub fn find(&self, category: Category, name: &str) -> Option<&BiasOrFallacyDefinition> {
        self.definitions(category)
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

fn validate_definitions(
    category: Category,
    definitions: &[BiasOrFallacyDefinition],
) -> Result<(), PatternError> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if definition.name.trim().is_empty() {
            return Err(PatternError::EmptyName {
                category: category.to_string(),
            });
        }
        if !seen.insert(definition.name.to_lowercase()) {
            return Err(PatternError::DuplicateName {
                category: category.to_string(),
                name: definition.name.clone(),
            });
        }
        for spec in &definition.patterns {
            if !spec.weight.is_finite() || !(0.0..=1.0).contains(&spec.weight) {
                return Err(PatternError::InvalidWeight {
                    definition: definition.name.clone(),
                    pattern: spec.pattern.clone(),
                    weight: spec.weight.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::patterns::PatternSpec;
    use std::io::Write;

    #[test]
    fn test_standard_library_loads() {
        let library = PatternLibrary::standard().unwrap();
        assert_eq!(library.version, CURRENT_SCHEMA_VERSION);
        assert!(!library.biases.is_empty());
        assert!(!library.fallacies.is_empty());
        assert!(!library.global_modifiers.negation_terms.is_empty());
        assert!(library.find(Category::Bias, "confirmation bias").is_some());
        assert!(library.find(Category::Fallacy, "Ad Hominem").is_some());
    }

    #[test]
    fn test_legacy_document_defaults_to_v1() {
        let json = r#"{
            "biases": [{"name": "Anchoring", "patterns": ["first offer"]}],
            "globalModifiers": {"hedgingTerms": ["somewhat"]}
        }"#;
        let library = PatternLibrary::from_json_str(json).unwrap();
        assert_eq!(library.version, 1);
        assert_eq!(library.biases[0].patterns[0].pattern, "first offer");
        assert_eq!(library.global_modifiers.hedging_terms, vec!["somewhat"]);
        assert!(library.fallacies.is_empty());
    }

    #[test]
    fn test_unknown_top_level_field_rejected() {
        let result = PatternLibrary::from_json_str(r#"{"version": 2, "heuristics": []}"#);
        assert!(matches!(result, Err(PatternError::Malformed { .. })));
    }

    #[test]
    fn test_misspelled_pattern_key_rejected() {
        let json = r#"{"version": 2, "biases": [{"name": "X", "patterns": [{"pattern": "knew", "wieght": 0.9}]}]}"#;
        assert!(matches!(
            PatternLibrary::from_json_str(json),
            Err(PatternError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let result = PatternLibrary::from_json_str(r#"{"version": 7}"#);
        assert_eq!(
            result.unwrap_err(),
            PatternError::UnsupportedVersion { version: 7, max: 2 }
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let def = BiasOrFallacyDefinition::new("Straw Man", "", vec![]);
        let result = PatternLibrary::new(
            vec![],
            vec![def.clone(), def],
            GlobalConfidenceModifiers::default(),
        );
        assert!(matches!(
            result,
            Err(PatternError::DuplicateName { name, .. }) if name == "Straw Man"
        ));
    }

    #[test]
    fn test_same_name_in_different_categories_allowed() {
        let def = BiasOrFallacyDefinition::new("Sunk Cost", "", vec![]);
        let result = PatternLibrary::new(
            vec![def.clone()],
            vec![def],
            GlobalConfidenceModifiers::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let def = BiasOrFallacyDefinition::new("  ", "", vec![]);
        let result = PatternLibrary::new(vec![def], vec![], GlobalConfidenceModifiers::default());
        assert!(matches!(result, Err(PatternError::EmptyName { .. })));
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let def = BiasOrFallacyDefinition::new(
            "Anchoring",
            "",
            vec![PatternSpec::new("first offer", 1.5, "")],
        );
        let result = PatternLibrary::new(vec![def], vec![], GlobalConfidenceModifiers::default());
        assert!(matches!(result, Err(PatternError::InvalidWeight { .. })));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version": 2, "fallacies": [{{"name": "Red Herring", "patterns": [{{"pattern": "but what about", "weight": 0.6}}]}}]}}"#
        )
        .unwrap();

        let library = PatternLibrary::from_path(file.path()).unwrap();
        assert_eq!(library.fallacies.len(), 1);
        assert!((library.fallacies[0].patterns[0].weight - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PatternLibrary::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(PatternError::Io { .. })));
    }
}
