#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output surfaces for production records.
//!
//! - [`csv_file`] writes typed records as `Employee,Date,Store,...` CSV and
//!   reads such files back, filling blank employee cells forward
//! - [`split`] writes one CSV per employee
//! - [`render`] draws summary, ranking, and detail tables as plain text

pub mod csv_file;
pub mod render;
pub mod split;

/// Errors that can occur while reading or writing report files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An input CSV is missing a required column.
    #[error("CSV file has no {0:?} column")]
    MissingColumn(&'static str),
}
