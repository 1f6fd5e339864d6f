//! Integration tests for ConfigStore and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Per-field fallback to defaults
//! - Legacy flat pattern layout
//! - Save failures leave the stored file untouched and no temporary files behind

use camino::Utf8PathBuf;
use filename_parser::models::DEFAULT_PATTERNS;
use filename_parser::{ConfigStore, ParserConfig};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

fn custom_config() -> ParserConfig {
    ParserConfig {
        patterns: vec![
            r"^(?P<series>.+?) v(?P<volume>\d+) (?P<number>\d+)$".to_string(),
            r"^(?P<number>\d+)$".to_string(),
        ],
        overwrite: true,
        strip_extension: false,
        normalize_underscores: false,
        strip_leading_zeros: true,
    }
}

#[test]
fn test_create_config_store() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    assert_eq!(store.config_dir(), &config_path);
    assert_eq!(store.config_path(), config_path.join("config.yaml").as_path());
}

#[test]
fn test_config_directory_creation() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("nonexistent_dir");

    assert!(!nested.exists());
    let _store = ConfigStore::new(&nested).unwrap();
    assert!(nested.exists());
}

#[test]
fn test_load_default_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    let config = store.load();

    assert_eq!(config, ParserConfig::default());
    assert_eq!(config.patterns.len(), DEFAULT_PATTERNS.len());
}

#[test]
fn test_save_and_load_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    store.save(&custom_config()).unwrap();

    assert_eq!(store.load(), custom_config());
}

#[test]
fn test_save_replaces_whole_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    store.save(&custom_config()).unwrap();
    store.save(&ParserConfig::default()).unwrap();

    assert_eq!(store.load(), ParserConfig::default());
}

#[test]
fn test_saved_empty_patterns_reload_as_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    let config = ParserConfig {
        patterns: Vec::new(),
        ..custom_config()
    };
    store.save(&config).unwrap();

    let loaded = store.load();
    assert!(loaded.uses_default_patterns());
    assert!(loaded.overwrite);
    assert!(loaded.strip_leading_zeros);
}

#[test]
fn test_legacy_flat_layout() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    let legacy_content = r#"
Config:
  overwrite: "True"
  strip_leading_zeros: "true"
  Pattern:
    - '^(?P<number>\d+) (?P<title>.+)$'
    - '^(?P<title>.+)$'
"#;
    fs::write(store.config_path(), legacy_content).unwrap();

    let config = store.load();

    assert!(config.overwrite);
    assert!(config.strip_leading_zeros);
    assert!(config.strip_extension);
    assert!(config.normalize_underscores);
    assert_eq!(
        config.patterns,
        vec![
            r"^(?P<number>\d+) (?P<title>.+)$".to_string(),
            "^(?P<title>.+)$".to_string()
        ]
    );

    // Saving rewrites the file in the nested layout
    store.save(&config).unwrap();
    let rewritten = fs::read_to_string(store.config_path()).unwrap();
    assert!(rewritten.contains("Patterns:"));
    assert!(!rewritten.contains("Pattern:\n"));
    assert_eq!(store.load(), config);
}

#[test]
fn test_invalid_yaml_falls_back_to_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    fs::write(store.config_path(), "invalid: yaml: content: {{").unwrap();

    assert_eq!(store.load(), ParserConfig::default());
}

#[test]
fn test_missing_root_falls_back_to_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    fs::write(store.config_path(), "Settings:\n  overwrite: 'true'\n").unwrap();

    assert_eq!(store.load(), ParserConfig::default());
}

#[test]
fn test_save_over_directory_fails_without_leftovers() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();

    // A directory where the file should be makes the final rename fail
    fs::create_dir(store.config_path()).unwrap();

    let result = store.save(&custom_config());

    assert!(result.is_err(), "Save over a directory should fail");
    assert!(store.config_path().is_dir());
    let entries = fs::read_dir(&config_path).unwrap().count();
    assert_eq!(entries, 1, "No temporary file should be left behind");
    assert_eq!(store.load(), ParserConfig::default());
}

#[cfg(unix)]
#[test]
fn test_failed_save_keeps_previous_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp_dir, config_path) = create_test_config_dir();
    let store = ConfigStore::new(&config_path).unwrap();
    store.save(&custom_config()).unwrap();
    let saved_text = fs::read_to_string(store.config_path()).unwrap();

    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can still write to a read-only directory
    let write_check = config_path.join("write_check");
    if fs::File::create(&write_check).is_ok() {
        fs::remove_file(&write_check).unwrap();
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = store.save(&ParserConfig::default());
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(result.is_err(), "Save into a read-only directory should fail");
    assert_eq!(fs::read_to_string(store.config_path()).unwrap(), saved_text);
    assert_eq!(store.load(), custom_config());
}

#[test]
fn test_concurrent_config_access() {
    use std::sync::Arc;

    let (_temp_dir, config_path) = create_test_config_dir();
    let store = Arc::new(ConfigStore::new(&config_path).unwrap());
    store.save(&custom_config()).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || store.load())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), custom_config());
    }
}
