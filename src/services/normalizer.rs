//! Filename preparation applied before pattern matching.

use crate::models::ParserConfig;

/// Longest suffix still treated as a file extension.
const MAX_EXTENSION_LEN: usize = 10;

/// Prepare a raw filename for matching.
///
/// Applies, in order: extension stripping, underscore normalization, and a final
/// trim, each controlled by `config`. The result is only used for matching.
///
/// # Examples
///
/// ```
/// use filename_parser::models::ParserConfig;
/// use filename_parser::services::prepare_name;
///
/// let config = ParserConfig::default();
/// assert_eq!(prepare_name(" 012_-_Spider-Man.cbz", &config), "012 - Spider-Man");
/// ```
pub fn prepare_name(raw: &str, config: &ParserConfig) -> String {
    let base = if config.strip_extension {
        strip_extension(raw)
    } else {
        raw
    };
    let mut name = base.to_string();

    if config.normalize_underscores {
        name = name.replace('_', " ");
    }

    name.trim().to_string()
}

/// Remove a trailing `.ext` suffix.
///
/// The suffix must be 1 to 10 alphanumeric characters and leave a non-empty stem;
/// anything else (`"Vol. 2"`, `".cbz"`, `"name."`) is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=MAX_EXTENSION_LEN).contains(&ext.chars().count())
                && ext.chars().all(char::is_alphanumeric) =>
        {
            stem
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(strip_extension: bool, normalize_underscores: bool) -> ParserConfig {
        ParserConfig {
            strip_extension,
            normalize_underscores,
            ..ParserConfig::default()
        }
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Batman (2011) #0 - Genesis.cbz"), "Batman (2011) #0 - Genesis");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("no extension"), "no extension");
        assert_eq!(strip_extension("Vol. 2 Part"), "Vol. 2 Part");
        assert_eq!(strip_extension(".cbz"), ".cbz");
        assert_eq!(strip_extension("trailing."), "trailing.");
        assert_eq!(strip_extension(""), "");
    }

    #[test]
    fn test_prepare_all_steps() {
        let prepared = prepare_name("  012_-_The_Amazing_Spider-Man_(1990).cbz ", &config(true, true));
        assert_eq!(prepared, "012 - The Amazing Spider-Man (1990)");
    }

    #[test]
    fn test_prepare_keeps_extension_when_disabled() {
        assert_eq!(prepare_name("001_Title.cbr", &config(false, true)), "001 Title.cbr");
    }

    #[test]
    fn test_prepare_keeps_underscores_when_disabled() {
        assert_eq!(prepare_name("001_Title.cbr", &config(true, false)), "001_Title");
    }

    #[test]
    fn test_prepare_empty() {
        assert_eq!(prepare_name("", &ParserConfig::default()), "");
    }

    proptest! {
        #[test]
        fn prop_prepared_name_is_trimmed(raw in "\\PC*") {
            let prepared = prepare_name(&raw, &config(true, true));
            prop_assert_eq!(prepared.trim(), prepared.as_str());
            prop_assert!(!prepared.contains('_'));
        }

        #[test]
        fn prop_strip_extension_is_prefix(raw in "[a-zA-Z0-9 ._-]{0,24}") {
            prop_assert!(raw.starts_with(strip_extension(&raw)));
        }
    }
}
