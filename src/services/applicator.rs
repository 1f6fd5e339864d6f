//! Writes matched groups onto a book under the overwrite policy.

use crate::models::{BookRecord, Field, FieldValue, ParserConfig, custom_field_key};
use crate::services::matcher::MatchResult;

/// Apply `result` to `book`.
///
/// For each fixed [`Field`] whose group is present, the value is written only if
/// `config.overwrite` is set or the current value is empty. Year, Month, Day and
/// Volume are written as integers when the text parses, as text otherwise.
/// Every `custom_*` group is forwarded to the book's custom values without the prefix.
///
/// Failures are isolated per field and per custom key; this never fails.
pub fn apply_match<B>(book: &mut B, result: &MatchResult, config: &ParserConfig)
where
    B: BookRecord + ?Sized,
{
    for field in Field::ALL {
        if let Some(raw) = result.get(field.group_name()) {
            set_if_allowed(book, field, raw, config.overwrite);
        }
    }

    for (group, value) in result.iter() {
        let Some(key) = custom_field_key(group) else {
            continue;
        };
        if let Err(e) = book.set_custom_value(key, value) {
            tracing::debug!("Skipping custom value {}: {}", key, e);
        }
    }
}

fn set_if_allowed<B>(book: &mut B, field: Field, raw: &str, overwrite: bool)
where
    B: BookRecord + ?Sized,
{
    let current = book.get_field(field).unwrap_or_else(|e| {
        tracing::debug!("Could not read {}, treating as empty: {}", field, e);
        None
    });
    let is_empty = current.as_ref().is_none_or(FieldValue::is_empty);

    if !(overwrite || is_empty) {
        tracing::trace!("Keeping existing {}", field);
        return;
    }

    let value = FieldValue::coerce_for(field, raw);
    if let Err(e) = book.set_field(field, value) {
        tracing::debug!("Skipping {}: {}", field, e);
    }
}
