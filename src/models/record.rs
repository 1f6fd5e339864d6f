use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Fixed book fields a filename match can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Series,
    Volume,
    Number,
    Title,
    Year,
    Month,
    Day,
}

impl Field {
    /// All fields, in the order they are applied.
    pub const ALL: [Field; 7] = [
        Field::Series,
        Field::Volume,
        Field::Number,
        Field::Title,
        Field::Year,
        Field::Month,
        Field::Day,
    ];

    /// Named capture group that feeds this field.
    pub fn group_name(self) -> &'static str {
        match self {
            Field::Series => "series",
            Field::Volume => "volume",
            Field::Number => "number",
            Field::Title => "title",
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
        }
    }

    /// Field name as the host exposes it.
    pub fn name(self) -> &'static str {
        match self {
            Field::Series => "Series",
            Field::Volume => "Volume",
            Field::Number => "Number",
            Field::Title => "Title",
            Field::Year => "Year",
            Field::Month => "Month",
            Field::Day => "Day",
        }
    }

    /// Fields the host stores as integers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Year | Field::Month | Field::Day | Field::Volume)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Value read from or written to a book field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    /// Blank text counts as empty; integers never do.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Integer(_) => false,
        }
    }

    /// Integer when `field` is numeric and `raw` parses, text otherwise.
    pub fn coerce_for(field: Field, raw: &str) -> Self {
        if field.is_numeric() {
            if let Ok(n) = raw.trim().parse::<i64>() {
                return FieldValue::Integer(n);
            }
        }
        FieldValue::Text(raw.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Failures a host record may report for a single field access.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("field {0} is not supported by this record")]
    UnsupportedField(Field),

    #[error("record rejected value for {field}: {reason}")]
    Rejected { field: Field, reason: String },

    #[error("custom value {key} could not be stored: {reason}")]
    CustomValue { key: String, reason: String },

    #[error("record is unavailable: {0}")]
    Unavailable(String),
}

/// Capabilities the parser needs from a host book record.
///
/// Hosts implement this over their own record type; the parser never depends on
/// anything else about the record.
#[cfg_attr(test, mockall::automock)]
pub trait BookRecord {
    /// Explicit file name, if the host keeps one.
    fn file_name(&self) -> Result<Option<String>, RecordError>;

    /// Full path of the book file.
    fn file_path(&self) -> Result<Option<String>, RecordError> {
        Ok(None)
    }

    fn get_field(&self, field: Field) -> Result<Option<FieldValue>, RecordError>;

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), RecordError>;

    fn set_custom_value(&mut self, key: &str, value: &str) -> Result<(), RecordError>;
}

/// In-memory book used by the command-line host and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Book {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    pub fields: IndexMap<Field, FieldValue>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub custom_values: IndexMap<String, String>,
}

impl Book {
    /// Book known only by its path on disk.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Book with an explicit file name.
    pub fn with_file_name(name: impl Into<String>) -> Self {
        Self {
            file_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Pre-populate a field.
    pub fn with_field(mut self, field: Field, value: FieldValue) -> Self {
        self.fields.insert(field, value);
        self
    }

    pub fn field(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn custom_value(&self, key: &str) -> Option<&str> {
        self.custom_values.get(key).map(String::as_str)
    }
}

impl BookRecord for Book {
    fn file_name(&self) -> Result<Option<String>, RecordError> {
        Ok(self.file_name.clone())
    }

    fn file_path(&self) -> Result<Option<String>, RecordError> {
        Ok(self.file_path.clone())
    }

    fn get_field(&self, field: Field) -> Result<Option<FieldValue>, RecordError> {
        Ok(self.fields.get(&field).cloned())
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), RecordError> {
        self.fields.insert(field, value);
        Ok(())
    }

    fn set_custom_value(&mut self, key: &str, value: &str) -> Result<(), RecordError> {
        self.custom_values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
