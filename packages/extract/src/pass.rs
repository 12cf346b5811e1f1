//! A full-document extraction pass.
//!
//! The pass is a left fold over every `(page, line)` pair in document order.
//! The accumulator holds the [`OwnerContext`], the records produced so far,
//! and the running [`PassStats`]. Because the owner context lives in the
//! accumulator rather than in shared state, its carryover from one page to
//! the next is an explicit sequential dependency.

use prod_report_production_models::{RawLine, RawRecord};

use crate::line::{LineClass, LineClassifier, NoiseKind};
use crate::{OwnerContext, record};

/// Line and record counts for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Number of pages in the document.
    pub pages: usize,
    /// Total lines seen.
    pub lines: usize,
    /// Page header/footer lines discarded.
    pub page_markers: usize,
    /// Repeated column-header lines discarded.
    pub column_headers: usize,
    /// Blank lines discarded.
    pub blank_lines: usize,
    /// Owner headings seen.
    pub owner_lines: usize,
    /// Lines classified as data.
    pub data_lines: usize,
    /// Data lines skipped for having fewer than two tokens.
    pub short_lines: usize,
    /// Records extracted.
    pub records: usize,
    /// Records extracted before any owner heading was seen.
    pub orphaned_records: usize,
    /// Records with at least one column-assignment guess.
    pub ambiguous_records: usize,
}

impl PassStats {
    /// Total noise lines of any kind.
    #[must_use]
    pub const fn noise_lines(&self) -> usize {
        self.page_markers + self.column_headers + self.blank_lines
    }
}

/// The result of an extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    /// Raw records in document order.
    pub records: Vec<RawRecord>,
    /// The owner context as it stood after the last line.
    pub owner: OwnerContext,
    /// Line and record counts.
    pub stats: PassStats,
}

impl ExtractionOutcome {
    /// Folds one line into the outcome.
    fn step(mut self, classifier: &LineClassifier, line: RawLine<'_>) -> Self {
        self.stats.lines += 1;

        match classifier.classify(line.text) {
            LineClass::Noise(kind) => match kind {
                NoiseKind::PageMarker => self.stats.page_markers += 1,
                NoiseKind::ColumnHeader => self.stats.column_headers += 1,
                NoiseKind::Blank => self.stats.blank_lines += 1,
            },
            LineClass::OwnerName(name) => {
                log::trace!("Page {}: owner heading {name:?}", line.page + 1);
                self.stats.owner_lines += 1;
                self.owner.observe(name);
            }
            LineClass::Data => {
                self.stats.data_lines += 1;
                let tokens: Vec<&str> = line.text.split_whitespace().collect();
                match record::extract(&tokens, &self.owner, line.page) {
                    Some(raw) => {
                        self.stats.records += 1;
                        if raw.owner.is_none() {
                            self.stats.orphaned_records += 1;
                        }
                        if !raw.ambiguities.is_empty() {
                            self.stats.ambiguous_records += 1;
                        }
                        self.records.push(raw);
                    }
                    None => self.stats.short_lines += 1,
                }
            }
        }

        self
    }
}

/// Runs an extraction pass over an ordered page sequence.
///
/// The owner context starts empty and is never reset, so an owner heading
/// on page N applies to data lines on page N+1 until a new heading appears.
/// An empty page sequence yields an empty outcome.
#[must_use]
pub fn extract_pages<S: AsRef<str>>(pages: &[S], classifier: &LineClassifier) -> ExtractionOutcome {
    let initial = ExtractionOutcome {
        stats: PassStats {
            pages: pages.len(),
            ..PassStats::default()
        },
        ..ExtractionOutcome::default()
    };

    let outcome = pages
        .iter()
        .enumerate()
        .flat_map(|(page, text)| {
            log::debug!("Extracting page {}/{}", page + 1, pages.len());
            text.as_ref()
                .lines()
                .map(move |text| RawLine { page, text })
        })
        .fold(initial, |acc, line| acc.step(classifier, line));

    log::info!(
        "Extracted {} records from {} pages ({} lines: {} owner, {} data, {} noise, {} short)",
        outcome.stats.records,
        outcome.stats.pages,
        outcome.stats.lines,
        outcome.stats.owner_lines,
        outcome.stats.data_lines,
        outcome.stats.noise_lines(),
        outcome.stats.short_lines,
    );
    if outcome.stats.ambiguous_records > 0 {
        log::warn!(
            "{} records have guessed column assignments",
            outcome.stats.ambiguous_records
        );
    }

    outcome
}
