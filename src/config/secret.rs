//! Redacted wrapper for the API key.

use std::fmt;

/// A string that never appears in `Debug` or `Display` output.
///
/// # Example
///
/// ```
/// use bias_lens::config::SecretString;
///
/// let key = SecretString::new("sk-ant-api-key-1234");
/// assert_eq!(format!("{key:?}"), "<REDACTED>");
/// assert_eq!(key.masked(), "****1234");
/// assert_eq!(key.expose(), "sk-ant-api-key-1234");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

/// Trailing characters shown by [`SecretString::masked`].
const VISIBLE_SUFFIX: usize = 4;

impl SecretString {
    /// Wrap a secret.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret. Only for building request headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last few characters behind a mask, for log lines.
    ///
    /// Secrets too short to hide anything are fully masked.
    #[must_use]
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count <= VISIBLE_SUFFIX * 2 {
            return "****".to_string();
        }
        let suffix: String = self.0.chars().skip(count - VISIBLE_SUFFIX).collect();
        format!("****{suffix}")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_formatting_is_redacted() {
        let secret = SecretString::new("super-secret-key");
        assert_eq!(format!("{secret:?}"), "<REDACTED>");
        assert_eq!(format!("{secret}"), "<REDACTED>");
        assert_eq!(secret.expose(), "super-secret-key");
    }

    #[test]
    fn test_conversions() {
        let from_string: SecretString = String::from("k").into();
        let from_str: SecretString = "k".into();
        assert_eq!(from_string, from_str);
    }

    #[test_case("", "****" ; "empty")]
    #[test_case("12345678", "****" ; "too short")]
    #[test_case("sk-ant-abcdefgh", "****efgh" ; "long key")]
    fn test_masked(raw: &str, expected: &str) {
        assert_eq!(SecretString::new(raw).masked(), expected);
    }
}
