//! Host entry points: "Parse" over selected books and "Configure".
//!
//! The host supplies books through [`BookRecord`] and receives user-facing
//! messages through a [`MessageSink`]. Neither entry point returns an error;
//! everything the user needs to know is reported as a message.

use crate::config::ConfigStore;
use crate::editor::{ConfigEditor, EditorAction};
use crate::models::{BookRecord, ParserConfig};
use crate::services::{BatchSummary, FilenameMatcher, parse_books};

/// Prefix of every message shown to the user.
pub const MESSAGE_PREFIX: &str = "Filename Parser";

/// Where user-facing messages go (a message box, a status bar, stderr).
pub trait MessageSink {
    fn show(&mut self, message: &str);
}

/// Collects messages, mostly for tests and previews.
impl MessageSink for Vec<String> {
    fn show(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Result of a configure session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    Saved(ParserConfig),
    Cancelled,
    SaveFailed,
}

/// The parser as the host sees it.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    store: ConfigStore,
}

impl FilenameParser {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Parse every book's file name and fill its fields.
    ///
    /// Reports "No comics selected" for an empty selection, one message per
    /// failing book, and finally the number of updated books.
    pub fn parse<B: BookRecord>(&self, books: &mut [B], sink: &mut dyn MessageSink) -> BatchSummary {
        if books.is_empty() {
            sink.show(&format!("{}: No comics selected", MESSAGE_PREFIX));
            return BatchSummary::default();
        }

        let config = self.store.load();
        let matcher = FilenameMatcher::new(&config);

        let summary = parse_books(books.iter_mut(), &matcher, |_, e| {
            sink.show(&format!("{}: Parse error: {}", MESSAGE_PREFIX, e));
        });

        sink.show(&format!(
            "{}: updated {} book(s).",
            MESSAGE_PREFIX, summary.updated
        ));
        summary
    }

    /// Edit the stored configuration.
    ///
    /// `session` receives an editor loaded from the store and decides whether to
    /// save. Saving persists the edited configuration as a whole; a failed save is
    /// reported and leaves the stored file untouched.
    pub fn configure<F>(&self, sink: &mut dyn MessageSink, session: F) -> ConfigureOutcome
    where
        F: FnOnce(&mut ConfigEditor) -> EditorAction,
    {
        let mut editor = ConfigEditor::from_config(&self.store.load());

        if session(&mut editor) == EditorAction::Cancel {
            tracing::info!("Configuration edit cancelled");
            return ConfigureOutcome::Cancelled;
        }

        for (pattern, error) in editor.invalid_patterns() {
            tracing::warn!("Saving pattern that does not compile: {} ({})", pattern, error);
        }

        let config = editor.to_config();
        match self.store.save(&config) {
            Ok(()) => ConfigureOutcome::Saved(config),
            Err(e) => {
                tracing::error!("Failed to save config: {}", e);
                sink.show(&format!("{}: Failed to save config: {}", MESSAGE_PREFIX, e));
                ConfigureOutcome::SaveFailed
            }
        }
    }
}
