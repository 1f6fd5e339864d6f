//! Data models for the filename parser.
//!
//! - [`ParserConfig`]: Ordered regex patterns and the four matching/applying flags
//! - [`BookRecord`]: The narrow capability interface a host book must provide
//! - [`Book`]: An in-memory [`BookRecord`] used by the command-line host and tests
//! - [`Field`] / [`FieldValue`]: The fixed fields a match can fill and their values

pub mod config;
pub mod record;

pub use config::{
    CUSTOM_FIELD_PREFIX, DEFAULT_PATTERNS, ParserConfig, custom_field_key, default_patterns,
};
pub use record::{Book, BookRecord, Field, FieldValue, RecordError};
#[cfg(test)]
pub use record::MockBookRecord;
