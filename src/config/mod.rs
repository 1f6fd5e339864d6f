use crate::models::ParserConfig;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_yaml_ng::Value;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use thiserror::Error;

/// File name of the parser configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Root key of the configuration document.
const ROOT_KEY: &str = "Config";

/// Errors reported when the configuration cannot be persisted.
///
/// Loading never fails; see [`ConfigStore::load`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to create config directory {path}: {source}")]
    CreateDir {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Loads and saves the parser configuration.
///
/// The document looks like:
///
/// ```yaml
/// Config:
///   overwrite: 'false'
///   strip_extension: 'true'
///   normalize_underscores: 'true'
///   strip_leading_zeros: 'false'
///   Patterns:
///   - ^(?P<number>\d{1,6})\s*-\s*(?P<title>.+)?$
/// ```
///
/// Older files listed patterns under a flat `Pattern` key directly in `Config`;
/// those are still read, but saves always write `Patterns`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at `config_dir`, creating the directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|source| ConfigError::CreateDir {
                path: config_dir.clone(),
                source,
            })?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the configuration, degrading to defaults field by field.
    ///
    /// A missing or unreadable file, a malformed document or a missing `Config`
    /// root yields [`ParserConfig::default`]. Otherwise each flag falls back to
    /// its own default, and an empty pattern list is replaced by the built-in one.
    pub fn load(&self) -> ParserConfig {
        if !self.config_path.exists() {
            tracing::info!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
            return ParserConfig::default();
        }

        match fs::read_to_string(&self.config_path) {
            Ok(contents) => {
                let config = parse_config_document(&contents);
                tracing::info!(
                    "Loaded config from {} ({} patterns)",
                    self.config_path,
                    config.patterns.len()
                );
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read config {}: {}, using defaults",
                    self.config_path,
                    e
                );
                ParserConfig::default()
            }
        }
    }

    /// Replace the stored configuration with `config`.
    ///
    /// The document is written to a temporary file next to the target and then
    /// renamed over it, so on error the previous file is left as it was.
    pub fn save(&self, config: &ParserConfig) -> Result<(), ConfigError> {
        let yaml = render_config_document(config)?;
        let write_err = |source| ConfigError::Write {
            path: self.config_path.clone(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.config_dir).map_err(write_err)?;
        temp.write_all(yaml.as_bytes()).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&self.config_path)
            .map_err(|e| write_err(e.error))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the configuration file path.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}

#[derive(Serialize)]
struct ConfigDocument<'a> {
    #[serde(rename = "Config")]
    config: ConfigSection<'a>,
}

#[derive(Serialize)]
struct ConfigSection<'a> {
    overwrite: &'static str,
    strip_extension: &'static str,
    normalize_underscores: &'static str,
    strip_leading_zeros: &'static str,

    #[serde(rename = "Patterns")]
    patterns: &'a [String],
}

fn flag_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Serialize `config` in the current (nested `Patterns`) layout.
pub fn render_config_document(config: &ParserConfig) -> Result<String, ConfigError> {
    let document = ConfigDocument {
        config: ConfigSection {
            overwrite: flag_text(config.overwrite),
            strip_extension: flag_text(config.strip_extension),
            normalize_underscores: flag_text(config.normalize_underscores),
            strip_leading_zeros: flag_text(config.strip_leading_zeros),
            patterns: &config.patterns,
        },
    };

    Ok(serde_yaml_ng::to_string(&document)?)
}

/// Build a configuration from document text, never failing.
pub fn parse_config_document(contents: &str) -> ParserConfig {
    let defaults = ParserConfig::default();

    let document: Value = match serde_yaml_ng::from_str(contents) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Malformed config document: {}, using defaults", e);
            return defaults;
        }
    };

    let Some(root) = document.get(ROOT_KEY).filter(|root| root.is_mapping()) else {
        tracing::warn!("Config document has no {} section, using defaults", ROOT_KEY);
        return defaults;
    };

    let patterns = read_patterns(root);
    if patterns.is_empty() {
        tracing::debug!("No patterns configured, using built-in patterns");
    }

    ParserConfig {
        patterns,
        overwrite: read_flag(root, "overwrite", defaults.overwrite),
        strip_extension: read_flag(root, "strip_extension", defaults.strip_extension),
        normalize_underscores: read_flag(
            root,
            "normalize_underscores",
            defaults.normalize_underscores,
        ),
        strip_leading_zeros: read_flag(root, "strip_leading_zeros", defaults.strip_leading_zeros),
    }
    .normalized()
}

/// Read one flag; anything missing, blank or unrecognized keeps `default`.
fn read_flag(root: &Value, name: &str, default: bool) -> bool {
    match root.get(name) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(text)) if !text.trim().is_empty() => {
            text.trim().eq_ignore_ascii_case("true")
        }
        None | Some(Value::Null) | Some(Value::String(_)) => default,
        Some(other) => {
            tracing::warn!("Config flag {} has unexpected value {:?}, using default", name, other);
            default
        }
    }
}

/// Patterns from the nested `Patterns` container, else from legacy flat `Pattern` entries.
fn read_patterns(root: &Value) -> Vec<String> {
    if let Some(container) = root.get("Patterns") {
        // `Patterns: { Pattern: [...] }` mirrors the element layout of older tools
        let entries = match container.get("Pattern") {
            Some(nested) if container.is_mapping() => nested,
            _ => container,
        };
        return pattern_entries(entries);
    }

    if let Some(flat) = root.get("Pattern") {
        tracing::info!("Reading patterns from legacy flat layout");
        return pattern_entries(flat);
    }

    Vec::new()
}

fn pattern_entries(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(pattern_text).collect(),
        other => pattern_text(other).into_iter().collect(),
    }
}

fn pattern_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
