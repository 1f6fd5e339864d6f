//! Ordered, first-match-wins pattern matching over prepared filenames.
//!
//! Each configured pattern is compiled once into a [`CompiledPattern`]. Matching a
//! name walks the list in order and stops at the first pattern that matches the
//! whole prepared text. Patterns that fail to compile are skipped.
//!
//! User patterns run on the `regex` crate, which guarantees linear-time matching,
//! so look-around and backreferences are rejected at compile time (and skipped).

use crate::models::ParserConfig;
use crate::services::normalizer::prepare_name;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// Group whose value is subject to leading-zero stripping.
const NUMBER_GROUP: &str = "number";

/// Named groups captured by the winning pattern.
///
/// Groups that did not participate, or captured only whitespace, are absent.
/// Keys are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    pattern_index: usize,
    groups: BTreeMap<String, String>,
}

impl MatchResult {
    /// Position of the winning pattern in the configured list.
    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    pub fn get(&self, group: &str) -> Option<&str> {
        self.groups.get(group).map(String::as_str)
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn groups(&self) -> &BTreeMap<String, String> {
        &self.groups
    }

    /// `key=value` pairs in key order, joined by `", "`.
    pub fn to_pairs_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// What happened when one pattern was tried against a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternOutcome {
    /// The pattern did not compile; try the next one.
    Invalid,
    /// The pattern compiled but did not match; try the next one.
    NoMatch,
    /// The pattern matched; stop here.
    Matched(MatchResult),
}

/// A configured pattern together with its compiled form or compile error.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl CompiledPattern {
    /// Compile `source` for a case-insensitive, Unicode-aware, whole-string match.
    ///
    /// Validity is decided by `source` alone. When `source` ends inside a
    /// verbose-mode `#` comment, the anchoring suffix goes on its own line.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = build_regex(&source).and_then(|_| {
            build_regex(&format!(r"\A(?:{})\z", source))
                .or_else(|_| build_regex(&format!("\\A(?:{}\n)\\z", source)))
        });

        Self { source, compiled }
    }

    /// The pattern as configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Compile error, if the pattern is invalid.
    pub fn error(&self) -> Option<&regex::Error> {
        self.compiled.as_ref().err()
    }

    /// Try this pattern against already prepared `text`.
    pub fn evaluate(&self, index: usize, text: &str, strip_zeros: bool) -> PatternOutcome {
        let Ok(regex) = &self.compiled else {
            return PatternOutcome::Invalid;
        };
        let Some(captures) = regex.captures(text) else {
            return PatternOutcome::NoMatch;
        };

        let mut groups = BTreeMap::new();
        for name in regex.capture_names().flatten() {
            let Some(capture) = captures.name(name) else {
                continue;
            };

            let value = capture.as_str().trim();
            let value = if strip_zeros && name == NUMBER_GROUP {
                strip_leading_zeros(value)
            } else {
                value.to_string()
            };

            if !value.is_empty() {
                groups.insert(name.to_string(), value);
            }
        }

        PatternOutcome::Matched(MatchResult {
            pattern_index: index,
            groups,
        })
    }
}

/// Compiled pattern list plus the settings that shape matching.
///
/// Build one per batch or preview and reuse it for every name.
#[derive(Debug, Clone)]
pub struct FilenameMatcher {
    config: ParserConfig,
    patterns: Vec<CompiledPattern>,
}

impl FilenameMatcher {
    pub fn new(config: &ParserConfig) -> Self {
        let patterns: Vec<CompiledPattern> =
            config.patterns.iter().map(CompiledPattern::new).collect();

        for (index, pattern) in patterns.iter().enumerate() {
            if let Some(e) = pattern.error() {
                tracing::warn!(
                    "Pattern #{} will be skipped, it does not compile: {}",
                    index + 1,
                    e
                );
            }
        }

        Self {
            config: config.clone(),
            patterns,
        }
    }

    /// Prepare `raw` per the configuration and match it.
    ///
    /// Returns `None` only when no pattern matched. A pattern that matched but
    /// captured nothing usable yields an empty [`MatchResult`].
    pub fn match_name(&self, raw: &str) -> Option<MatchResult> {
        let text = prepare_name(raw, &self.config);
        self.match_prepared(&text)
    }

    /// Match text that has already been prepared.
    pub fn match_prepared(&self, text: &str) -> Option<MatchResult> {
        for (index, pattern) in self.patterns.iter().enumerate() {
            match pattern.evaluate(index, text, self.config.strip_leading_zeros) {
                PatternOutcome::Matched(result) => {
                    tracing::debug!(
                        "{:?} matched pattern #{} with {} group(s)",
                        text,
                        index + 1,
                        result.len()
                    );
                    return Some(result);
                }
                PatternOutcome::Invalid | PatternOutcome::NoMatch => continue,
            }
        }

        tracing::debug!("{:?} matched no pattern", text);
        None
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Patterns that failed to compile, in configured order.
    pub fn invalid_patterns(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter().filter(|p| !p.is_valid())
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

fn build_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(true)
        .build()
}

/// Match `raw` against `config` in one go.
pub fn match_filename(raw: &str, config: &ParserConfig) -> Option<MatchResult> {
    FilenameMatcher::new(config).match_name(raw)
}

/// Strip leading zeros that are followed by another digit.
///
/// `"007"` becomes `"7"`, `"000"` becomes `"0"`, `"00.5"` becomes `"0.5"`, and a
/// value is never reduced to an empty string.
pub fn strip_leading_zeros(value: &str) -> String {
    let zeros = value.len() - value.trim_start_matches('0').len();
    if zeros == 0 {
        return value.to_string();
    }

    let followed_by_digit = value[zeros..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    let cut = if followed_by_digit { zeros } else { zeros - 1 };

    value[cut..].to_string()
}
