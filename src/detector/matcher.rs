//! Sentence matching and exclusion filtering.

use super::types::PatternMatch;
use crate::patterns::CompiledDefinition;

/// Scan one sentence against one compiled definition.
///
/// Each pattern contributes at most its first occurrence. Results follow
/// pattern order, not position in the sentence. Offsets and lengths are in
/// characters. The sentence is matched as given; only case is ignored.
#[must_use]
pub fn find_matches(sentence: &str, compiled: &CompiledDefinition) -> Vec<PatternMatch> {
    if sentence.is_empty() {
        return Vec::new();
    }

    compiled
        .compiled_patterns
        .iter()
        .filter_map(|pattern| {
            pattern.matcher.find(sentence).map(|m| PatternMatch {
                pattern_text: pattern.pattern_text().to_string(),
                matched_text: m.as_str().to_string(),
                start_offset: sentence[..m.start()].chars().count(),
                length: m.as_str().chars().count(),
                weight: pattern.weight,
            })
        })
        .collect()
}

/// Returns true if the sentence matches any exclusion of the definition.
///
/// Independent of whether any pattern matched.
#[must_use]
pub fn is_excluded(sentence: &str, compiled: &CompiledDefinition) -> bool {
    compiled
        .compiled_exclusions
        .iter()
        .any(|exclusion| exclusion.is_match(sentence))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::patterns::{BiasOrFallacyDefinition, PatternSpec};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn compiled(patterns: &[(&str, f64)]) -> CompiledDefinition {
        let specs = patterns
            .iter()
            .map(|(p, w)| PatternSpec::new(*p, *w, ""))
            .collect();
        CompiledDefinition::compile(&BiasOrFallacyDefinition::new("Test", "", specs)).unwrap()
    }

    #[test]
    fn test_first_occurrence_only() {
        let def = compiled(&[("always", 0.5)]);
        let matches = find_matches("Always and always and ALWAYS.", &def);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start_offset, 0);
        assert_eq!(matches[0].matched_text, "Always");
    }

    #[test]
    fn test_matches_follow_pattern_order() {
        let def = compiled(&[("later", 0.4), ("first", 0.6)]);
        let matches = find_matches("first comes before later", &def);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].pattern_text, "later");
        assert_eq!(matches[0].start_offset, 19);
        assert_eq!(matches[1].pattern_text, "first");
        assert_eq!(matches[1].start_offset, 0);
        assert!((matches[1].weight - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_offsets_are_characters() {
        let def = compiled(&[("knew", 0.5)]);
        let sentence = "Ça, I knew.";
        let matches = find_matches(sentence, &def);
        assert_eq!(matches[0].start_offset, 6);
        assert_eq!(matches[0].length, 4);
    }

    #[test]
    fn test_empty_sentence() {
        let def = compiled(&[("anything", 0.5)]);
        assert!(find_matches("", &def).is_empty());
    }

    #[test]
    fn test_no_exclusions_never_excluded() {
        let def = compiled(&[("x", 0.5)]);
        assert!(!is_excluded("x marks the spot", &def));
    }

    #[test]
    fn test_exclusion_case_insensitive() {
        let def = CompiledDefinition::compile(
            &BiasOrFallacyDefinition::new("Test", "", vec![PatternSpec::new("experts say", 0.5, "")])
                .with_exclusion("peer[- ]reviewed", "cites research"),
        )
        .unwrap();
        assert!(is_excluded("A PEER-REVIEWED study where experts say so", &def));
        assert!(is_excluded("peer reviewed, nothing else", &def));
        assert!(!is_excluded("Experts say so", &def));
    }

    proptest! {
        #[test]
        fn prop_matched_text_equals_substring(sentence in "\\PC{0,60}") {
            let def = compiled(&[("[aeiou]+", 0.5), ("é", 0.5), ("\\d", 0.5)]);
            for m in find_matches(&sentence, &def) {
                let slice: String = sentence.chars().skip(m.start_offset).take(m.length).collect();
                prop_assert_eq!(slice, m.matched_text);
            }
        }
    }
}
