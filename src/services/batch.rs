//! Sequential parse-and-apply over a collection of books.

use crate::models::{BookRecord, RecordError};
use crate::services::applicator::apply_match;
use crate::services::matcher::FilenameMatcher;

/// What happened to a single book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    /// A pattern matched and its groups were applied.
    Updated,
    /// A pattern matched but captured no usable group.
    EmptyMatch,
    /// No pattern matched the file name.
    Unmatched,
    /// Neither a file name nor a path was available.
    NoFileName,
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub updated: usize,
    pub empty_matches: usize,
    pub unmatched: usize,
    pub no_file_name: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: BookOutcome) {
        match outcome {
            BookOutcome::Updated => self.updated += 1,
            BookOutcome::EmptyMatch => self.empty_matches += 1,
            BookOutcome::Unmatched => self.unmatched += 1,
            BookOutcome::NoFileName => self.no_file_name += 1,
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Batch finished: {} processed, {} updated, {} unmatched, {} without file name, {} empty matches, {} failed",
            self.processed,
            self.updated,
            self.unmatched,
            self.no_file_name,
            self.empty_matches,
            self.failed
        );
    }
}

/// File name to match for `book`.
///
/// Prefers a non-blank explicit file name, then the last component of the path.
/// Host paths may use either `/` or `\` as separator.
pub fn resolve_filename<B>(book: &B) -> Result<Option<String>, RecordError>
where
    B: BookRecord + ?Sized,
{
    if let Some(name) = book.file_name()?.filter(|n| !n.trim().is_empty()) {
        return Ok(Some(name));
    }

    let from_path = book.file_path()?.and_then(|path| {
        path.rsplit(['/', '\\'])
            .next()
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
    });
    Ok(from_path)
}

/// Match one book's file name and apply the result.
pub fn process_book<B>(book: &mut B, matcher: &FilenameMatcher) -> Result<BookOutcome, RecordError>
where
    B: BookRecord + ?Sized,
{
    let Some(file_name) = resolve_filename(&*book)? else {
        return Ok(BookOutcome::NoFileName);
    };

    let Some(result) = matcher.match_name(&file_name) else {
        return Ok(BookOutcome::Unmatched);
    };

    apply_match(book, &result, matcher.config());
    if result.is_empty() {
        Ok(BookOutcome::EmptyMatch)
    } else {
        Ok(BookOutcome::Updated)
    }
}

/// Process every book in order.
///
/// A failing book is handed to `on_error` with its position and does not stop
/// the batch.
pub fn parse_books<'a, B, I, F>(books: I, matcher: &FilenameMatcher, mut on_error: F) -> BatchSummary
where
    B: BookRecord + ?Sized + 'a,
    I: IntoIterator<Item = &'a mut B>,
    F: FnMut(usize, &RecordError),
{
    let mut summary = BatchSummary::default();

    for (index, book) in books.into_iter().enumerate() {
        summary.processed += 1;
        match process_book(book, matcher) {
            Ok(outcome) => summary.record(outcome),
            Err(e) => {
                tracing::warn!("Book #{} failed: {}", index + 1, e);
                summary.failed += 1;
                on_error(index, &e);
            }
        }
    }

    summary.log_summary();
    summary
}
