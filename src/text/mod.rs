//! Text cleaning and sentence splitting.
//!
//! [`clean_text`] prepares raw article text for detection and
//! [`PunctuationSplitter`] is the default [`SentenceSplitter`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::traits::SentenceSplitter;

#[allow(clippy::expect_used)]
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"]+"#).expect("URL regex is valid")
});

#[allow(clippy::expect_used)]
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

#[allow(clippy::expect_used)]
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*\s+"#).expect("boundary regex is valid")
});

/// Abbreviations that end in a period without ending a sentence.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "corp", "gov", "sen", "rep", "gen", "no", "u.s", "u.k", "jan", "feb", "mar", "apr",
    "aug", "sept", "oct", "nov", "dec",
];

/// Preprocessing switches applied by [`clean_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Strip `http(s)://` and `www.` links.
    pub remove_urls: bool,
    /// Replace typographic quotes, dashes and ellipses with ASCII.
    pub normalize_punctuation: bool,
    /// Lowercase the whole text.
    pub lowercase: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            remove_urls: true,
            normalize_punctuation: true,
            lowercase: false,
        }
    }
}

/// Clean raw text before detection.
///
/// Applies the enabled options, then collapses every whitespace run to a
/// single space and trims the result.
#[must_use]
pub fn clean_text(text: &str, options: &PreprocessOptions) -> String {
    let mut cleaned = if options.remove_urls {
        URL_RE.replace_all(text, " ").into_owned()
    } else {
        text.to_string()
    };

    if options.normalize_punctuation {
        cleaned = normalize_punctuation(&cleaned);
    }
    if options.lowercase {
        cleaned = cleaned.to_lowercase();
    }

    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}

/// Replace typographic punctuation with its ASCII counterpart.
#[must_use]
pub fn normalize_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => out.push('"'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' => out.push('\''),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{3000}' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Splits on `.`, `!` or `?` followed by whitespace.
///
/// A period directly after a known abbreviation or a single-letter initial
/// does not end a sentence.
#[derive(Debug, Clone)]
pub struct PunctuationSplitter {
    abbreviations: Vec<String>,
}

impl Default for PunctuationSplitter {
    fn default() -> Self {
        Self::with_abbreviations(DEFAULT_ABBREVIATIONS.iter().copied())
    }
}

impl PunctuationSplitter {
    /// Create a splitter with a custom abbreviation list (case-insensitive).
    #[must_use]
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|a| a.as_ref().trim_end_matches('.').to_lowercase())
                .collect(),
        }
    }

    fn is_abbreviation(&self, before: &str) -> bool {
        let word = before
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.is_empty() {
            return false;
        }
        let mut chars = word.chars();
        let single_initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
        single_initial || self.abbreviations.iter().any(|a| *a == word)
    }
}

impl SentenceSplitter for PunctuationSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in BOUNDARY_RE.find_iter(text) {
            let terminator = boundary.as_str().trim_end();
            if terminator.starts_with('.')
                && !terminator.starts_with("..")
                && self.is_abbreviation(&text[start..boundary.start()])
            {
                continue;
            }
            let sentence = text[start..boundary.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = boundary.end();
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }
}
