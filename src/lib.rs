// Filename Parser - fill comic book metadata from filenames
//
// This is the library crate containing the matching engine, configuration
// handling and host entry points. The binary crate (main.rs) is a command-line host.

pub mod config;
pub mod editor;
pub mod logging;
pub mod models;
pub mod plugin;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigStore};
pub use editor::{ConfigEditor, EditorAction};
pub use models::{Book, BookRecord, Field, FieldValue, ParserConfig, RecordError};
pub use plugin::{ConfigureOutcome, FilenameParser, MessageSink};
pub use services::{FilenameMatcher, MatchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
