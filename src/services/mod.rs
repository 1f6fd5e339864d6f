//! Services module - the matching and applying engine.
//!
//! These services have no knowledge of how configuration is stored or how the
//! host presents messages; every input is an explicit parameter.
//!
//! # Components
//!
//! - [`prepare_name`]: Normalizes a raw filename (extension, underscores, whitespace)
//! - [`FilenameMatcher`]: Compiles the configured patterns once and returns the
//!   first [`MatchResult`] for a name
//! - [`apply_match`]: Writes a [`MatchResult`] onto a [`BookRecord`](crate::models::BookRecord)
//!   under the overwrite policy
//! - [`parse_books`]: Runs match + apply over a batch of books, isolating per-book errors
//!
//! # Usage Example
//!
//! ```
//! use filename_parser::models::{Book, Field, FieldValue, ParserConfig};
//! use filename_parser::services::{FilenameMatcher, process_book, BookOutcome};
//!
//! let matcher = FilenameMatcher::new(&ParserConfig::default());
//! let mut book = Book::from_path("/comics/Batman (2011) #0 - Genesis.cbz");
//!
//! assert_eq!(process_book(&mut book, &matcher).unwrap(), BookOutcome::Updated);
//! assert_eq!(book.field(Field::Volume), Some(&FieldValue::Integer(2011)));
//! ```

pub mod applicator;
pub mod batch;
pub mod matcher;
pub mod normalizer;

pub use applicator::apply_match;
pub use batch::{BatchSummary, BookOutcome, parse_books, process_book, resolve_filename};
pub use matcher::{
    CompiledPattern, FilenameMatcher, MatchResult, PatternOutcome, match_filename,
    strip_leading_zeros,
};
pub use normalizer::{prepare_name, strip_extension};
