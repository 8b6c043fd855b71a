//! URL matchers for search-and-replace over URL values.

use regex::Regex;

use crate::Result;

/// Selects URL values for
/// [`change_url_content`](crate::UrlEditor::change_url_content).
///
/// Either a compiled pattern or a plain substring. Both forms convert via
/// `Into`, so call sites pass a [`Regex`] or a string directly.
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    /// Match values against a compiled pattern.
    Pattern(Regex),
    /// Match values containing a substring.
    Substring(String),
}

impl UrlMatcher {
    /// Compile a textual pattern into a matcher.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Whether `value` is selected by this matcher.
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(value),
            Self::Substring(text) => value.contains(text.as_str()),
        }
    }

    /// Replace the first match in `value` with `replacement`.
    ///
    /// Pattern replacements may reference capture groups (`$1`). Later
    /// occurrences are left alone.
    pub fn replace_first(&self, value: &str, replacement: &str) -> String {
        match self {
            Self::Pattern(pattern) => pattern.replace(value, replacement).into_owned(),
            Self::Substring(text) => value.replacen(text.as_str(), replacement, 1),
        }
    }
}

impl From<Regex> for UrlMatcher {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<&str> for UrlMatcher {
    fn from(text: &str) -> Self {
        Self::Substring(text.to_string())
    }
}

impl From<String> for UrlMatcher {
    fn from(text: String) -> Self {
        Self::Substring(text)
    }
}
