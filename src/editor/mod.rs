// Configuration editor model
//
// Holds the in-progress edit of a ParserConfig the way an editor form shows it:
// one pattern per line plus the four toggles. Nothing is persisted from here;
// FilenameParser::configure decides whether the edit is saved.

use crate::models::ParserConfig;
use crate::services::FilenameMatcher;

/// Preview text when nothing usable matched.
pub const NO_MATCH_TEXT: &str = "No match.";

/// How an editing session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    Cancel,
}

/// Editable copy of a [`ParserConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEditor {
    pattern_text: String,
    pub overwrite: bool,
    pub strip_extension: bool,
    pub normalize_underscores: bool,
    pub strip_leading_zeros: bool,
}

impl ConfigEditor {
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            pattern_text: config.patterns.join("\n"),
            overwrite: config.overwrite,
            strip_extension: config.strip_extension,
            normalize_underscores: config.normalize_underscores,
            strip_leading_zeros: config.strip_leading_zeros,
        }
    }

    /// Patterns as edited, one per line.
    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    /// Replace the whole pattern text. `\n` and `\r\n` line endings are both accepted.
    pub fn set_pattern_text(&mut self, text: impl Into<String>) {
        self.pattern_text = text.into();
    }

    /// Append a pattern on a new line.
    pub fn add_pattern(&mut self, pattern: &str) {
        if !self.pattern_text.is_empty() && !self.pattern_text.ends_with('\n') {
            self.pattern_text.push('\n');
        }
        self.pattern_text.push_str(pattern);
    }

    /// Trimmed, non-blank lines of the pattern text.
    pub fn patterns(&self) -> Vec<String> {
        self.pattern_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The configuration as currently edited.
    ///
    /// The pattern list may be empty here; loading it back restores the defaults.
    pub fn to_config(&self) -> ParserConfig {
        ParserConfig {
            patterns: self.patterns(),
            overwrite: self.overwrite,
            strip_extension: self.strip_extension,
            normalize_underscores: self.normalize_underscores,
            strip_leading_zeros: self.strip_leading_zeros,
        }
    }

    /// Patterns that do not compile, with the compiler's message.
    pub fn invalid_patterns(&self) -> Vec<(String, String)> {
        FilenameMatcher::new(&self.to_config())
            .invalid_patterns()
            .map(|p| {
                let message = p.error().map(ToString::to_string).unwrap_or_default();
                (p.source().to_string(), message)
            })
            .collect()
    }

    /// Match `sample` against the unsaved edit.
    ///
    /// Returns the sorted `key=value` pairs, or [`NO_MATCH_TEXT`] when no pattern
    /// matched or the winning pattern captured no field.
    pub fn test(&self, sample: &str) -> String {
        match FilenameMatcher::new(&self.to_config()).match_name(sample) {
            Some(result) if !result.is_empty() => result.to_pairs_string(),
            _ => NO_MATCH_TEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_config() {
        let config = ParserConfig {
            overwrite: true,
            strip_leading_zeros: true,
            ..ParserConfig::default()
        };
        assert_eq!(ConfigEditor::from_config(&config).to_config(), config);
    }

    #[test]
    fn test_patterns_from_crlf_text() {
        let mut editor = ConfigEditor::from_config(&ParserConfig::default());
        editor.set_pattern_text("  ^a$  \r\n\r\n^b$\r\n   \n");

        assert_eq!(editor.patterns(), vec!["^a$".to_string(), "^b$".to_string()]);
    }

    #[test]
    fn test_add_pattern() {
        let mut editor = ConfigEditor::from_config(&ParserConfig::default());
        editor.set_pattern_text("^a$");
        editor.add_pattern("^b$");

        assert_eq!(editor.pattern_text(), "^a$\n^b$");
    }

    #[test]
    fn test_preview_uses_unsaved_toggles() {
        let mut editor = ConfigEditor::from_config(&ParserConfig::default());
        assert_eq!(editor.test("012 - Origins.cbz"), "number=012, title=Origins");

        editor.strip_leading_zeros = true;
        assert_eq!(editor.test("012 - Origins.cbz"), "number=12, title=Origins");
    }

    #[test]
    fn test_preview_no_match() {
        let mut editor = ConfigEditor::from_config(&ParserConfig::default());
        assert_eq!(editor.test("readme"), NO_MATCH_TEXT);

        editor.set_pattern_text("readme");
        // Matches, but captures nothing to show
        assert_eq!(editor.test("README.txt"), NO_MATCH_TEXT);

        editor.set_pattern_text("");
        assert_eq!(editor.test("012 - Origins"), NO_MATCH_TEXT);
    }

    #[test]
    fn test_invalid_patterns_reported() {
        let mut editor = ConfigEditor::from_config(&ParserConfig::default());
        editor.set_pattern_text("(?P<number>\\d+)\n(?P<title>.+");

        let invalid = editor.invalid_patterns();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].0, "(?P<title>.+");
        assert!(!invalid[0].1.is_empty());
    }
}
