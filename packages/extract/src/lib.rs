#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record extraction for employee production reports.
//!
//! Production reports are tabular PDFs whose column boundaries do not
//! survive text extraction. This crate reconstructs records from the
//! whitespace-tokenized lines that remain:
//!
//! - [`line`] decides whether a line is noise, an owner heading, or data
//! - [`token`] classifies individual tokens by shape
//! - [`record`] assigns the tokens of a data line to columns
//! - [`pass`] folds an ordered page sequence into raw records while
//!   carrying the current owner across lines and pages ([`owner`])
//! - [`clean`] turns raw records into typed records
//!
//! Page text comes from [`pages`], which wraps [`pdf_extract`] for PDF
//! inputs and splits plain-text inputs on form feeds.

pub mod call_ins;
pub mod clean;
pub mod line;
pub mod owner;
pub mod pages;
pub mod pass;
pub mod progress;
pub mod record;
pub mod token;

pub use clean::{CleanOutcome, Rejection, clean, clean_all, parse_metric};
pub use line::{LineClass, LineClassifier, NoiseKind};
pub use owner::OwnerContext;
pub use pass::{ExtractionOutcome, PassStats, extract_pages};

use prod_report_production_models::DatePolicy;

/// Column-header captions that repeat at the top of every page of the
/// production report once their spacing has been lost.
pub const DEFAULT_HEADER_FRAGMENTS: &[&str] = &[
    "Pieces/Hr$/HrSkus/Hr",
    "Pieces/Hr $/Hr Skus/Hr",
    "Date Store Pieces/Hr $/Hr Skus/Hr",
];

/// Errors specific to production report extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options that shape a single extraction and cleaning pass.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Lines that are exactly one of these (ignoring whitespace) are
    /// discarded as repeated column headers.
    pub header_fragments: Vec<String>,
    /// How record dates are validated during cleaning.
    pub date_policy: DatePolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            header_fragments: DEFAULT_HEADER_FRAGMENTS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            date_policy: DatePolicy::default(),
        }
    }
}

impl ExtractOptions {
    /// Replaces the header fragments.
    #[must_use]
    pub fn with_header_fragments(mut self, fragments: Vec<String>) -> Self {
        self.header_fragments = fragments;
        self
    }

    /// Sets the date policy.
    #[must_use]
    pub const fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }
}
