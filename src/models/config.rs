use serde::{Deserialize, Serialize};

/// Built-in patterns, tried in this order when no usable pattern list is configured.
pub const DEFAULT_PATTERNS: [&str; 4] = [
    r"^(?P<number>\d{1,6})\s*-\s*(?P<title>.+)?$",
    r"^(?P<number>\d{1,6})\s*-\s*(?P<series>[^-]+?)(?:\s*-\s*(?P<title>.+))?$",
    r"^(?P<number>\d{1,6})\s*-\s*(?P<series>.+?)\s*\((?P<year>\d{4})\)$",
    r"^(?P<series>.+?)\s+\((?P<volume>\d{4})\)\s*#(?P<number>[\dA-Za-z\.]+)(?:\s*-\s*(?P<title>.*))?$",
];

/// Groups starting with this prefix are forwarded to the book's custom values.
pub const CUSTOM_FIELD_PREFIX: &str = "custom_";

/// Parser configuration persisted in `config.yaml`.
///
/// The pattern list is ordered: the first pattern that matches a filename wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub patterns: Vec<String>,

    /// Replace field values that are already set on the book.
    pub overwrite: bool,

    /// Remove a trailing `.ext` before matching.
    pub strip_extension: bool,

    /// Turn `_` into spaces before matching.
    pub normalize_underscores: bool,

    /// `007` becomes `7` in the `number` group.
    pub strip_leading_zeros: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            overwrite: false,
            strip_extension: true,
            normalize_underscores: true,
            strip_leading_zeros: false,
        }
    }
}

/// Owned copy of [`DEFAULT_PATTERNS`].
pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
}

impl ParserConfig {
    /// Trim every pattern, drop blank ones, and fall back to the defaults if none remain.
    pub fn normalized(mut self) -> Self {
        self.patterns = self
            .patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if self.patterns.is_empty() {
            self.patterns = default_patterns();
        }
        self
    }

    /// True when the pattern list is exactly the built-in list.
    pub fn uses_default_patterns(&self) -> bool {
        self.patterns.iter().map(String::as_str).eq(DEFAULT_PATTERNS)
    }
}

/// Returns the custom value key for a `custom_*` group, if it is one.
pub fn custom_field_key(group: &str) -> Option<&str> {
    group.strip_prefix(CUSTOM_FIELD_PREFIX)
}
