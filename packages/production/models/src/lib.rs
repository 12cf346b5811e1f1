#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types for employee production report extraction.
//!
//! Production reports arrive as paginated text with no reliable column
//! delimiters. The extraction layer turns each data line into a
//! [`RawRecord`] (token text only), and the cleaning layer turns that into a
//! [`TypedRecord`] with parsed metrics and a parsed (or explicitly unknown)
//! date. Both carry the list of [`Ambiguity`] flags raised while assigning
//! tokens to columns.

pub use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Date format used by the source reports (`MM/DD/YYYY`).
pub const REPORT_DATE_FORMAT: &str = "%m/%d/%Y";

/// One line of page text, attributed to the zero-based page it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Zero-based page index within the document.
    pub page: usize,
    /// The line text exactly as extracted.
    pub text: &'a str,
}

/// One of the three per-record performance metrics.
///
/// Display and parsing use the column captions from the source report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// First plain-numeric column.
    #[strum(serialize = "Pieces/Hr")]
    Pieces,
    /// Currency-prefixed column.
    #[strum(serialize = "$/Hr")]
    Dollars,
    /// Second plain-numeric column.
    #[strum(serialize = "Skus/Hr")]
    Skus,
}

impl Metric {
    /// All metrics in report column order.
    pub const ALL: [Self; 3] = [Self::Pieces, Self::Dollars, Self::Skus];
}

/// The numeric metrics of a record or the averages of a group.
///
/// `None` means "not measured" (an empty or unparseable cell, or a group
/// with no positive readings), which is never the same as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Pieces per hour.
    pub pieces: Option<f64>,
    /// Dollars per hour.
    pub dollars: Option<f64>,
    /// SKUs per hour.
    pub skus: Option<f64>,
}

impl Metrics {
    /// Returns the value of a single metric.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Pieces => self.pieces,
            Metric::Dollars => self.dollars,
            Metric::Skus => self.skus,
        }
    }

    /// Sets the value of a single metric.
    pub const fn set(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::Pieces => self.pieces = value,
            Metric::Dollars => self.dollars = value,
            Metric::Skus => self.skus = value,
        }
    }
}

/// A record date: either parsed, or kept as the raw token under the
/// "unknown date" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordDate {
    /// A successfully parsed calendar date.
    Parsed(NaiveDate),
    /// A date token that could not be parsed.
    Unknown(String),
}

impl RecordDate {
    /// Returns the parsed date, if any.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Parsed(date) => Some(*date),
            Self::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for RecordDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parsed(date) => write!(f, "{}", date.format(REPORT_DATE_FORMAT)),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// A column-assignment guess the extractor could not make with confidence.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Ambiguity {
    /// A purely numeric token landed in the location because both numeric
    /// slots were already filled.
    NumericInLocation,
    /// A second currency token landed in the location.
    ExtraCurrency,
    /// No currency token was found on the line.
    MissingCurrency,
    /// Fewer than two plain-numeric tokens were found on the line.
    MissingNumeric,
    /// No label tokens were left over for the location.
    EmptyLocation,
    /// Two plain-numeric tokens sat side by side before any currency token,
    /// so the first may belong to the store label rather than `Pieces/Hr`.
    AdjacentNumerics,
}

/// A record as extracted from one data line, before any numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    /// The owner in effect when the line was read, if one had been seen.
    pub owner: Option<String>,
    /// The first token of the line.
    pub date: String,
    /// Space-joined label tokens.
    pub location: String,
    /// First plain-numeric token (empty if none).
    pub pieces_text: String,
    /// First currency token (empty if none).
    pub dollars_text: String,
    /// Second plain-numeric token (empty if none).
    pub skus_text: String,
    /// Zero-based page the line came from.
    pub page: usize,
    /// Column-assignment guesses raised for this line.
    pub ambiguities: Vec<Ambiguity>,
}

impl RawRecord {
    /// Returns the raw text of a single metric cell.
    #[must_use]
    pub fn metric_text(&self, metric: Metric) -> &str {
        match metric {
            Metric::Pieces => &self.pieces_text,
            Metric::Dollars => &self.dollars_text,
            Metric::Skus => &self.skus_text,
        }
    }
}

/// A cleaned record with typed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedRecord {
    /// Owning employee. Never empty.
    pub owner: String,
    /// Record date.
    pub date: RecordDate,
    /// Store / location label.
    pub location: String,
    /// Parsed metrics; unparseable cells are `None`.
    pub metrics: Metrics,
    /// Column-assignment guesses carried over from extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguities: Vec<Ambiguity>,
}

impl TypedRecord {
    /// Returns `true` if every column was assigned without guessing.
    #[must_use]
    pub fn is_confident(&self) -> bool {
        self.ambiguities.is_empty()
    }
}

/// How record dates are validated during cleaning.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatePolicy {
    /// Drop rows whose date is not a valid `M/D/YYYY` date.
    #[default]
    Strict,
    /// Keep every row; unparseable dates become [`RecordDate::Unknown`].
    Lenient,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn metric_captions_round_trip() {
        assert_eq!(Metric::Dollars.to_string(), "$/Hr");
        assert_eq!(Metric::from_str("Skus/Hr").unwrap(), Metric::Skus);
    }

    #[test]
    fn metrics_get_and_set() {
        let mut metrics = Metrics::default();
        metrics.set(Metric::Skus, Some(40.0));
        assert_eq!(metrics.get(Metric::Skus), Some(40.0));
        assert_eq!(metrics.get(Metric::Pieces), None);
    }

    #[test]
    fn record_date_displays_report_format() {
        let date = RecordDate::Parsed(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(date.to_string(), "01/05/2025");
        assert_eq!(RecordDate::Unknown("1/5".to_owned()).to_string(), "1/5");
    }

    #[test]
    fn date_policy_parses_from_config_text() {
        assert_eq!(DatePolicy::from_str("lenient").unwrap(), DatePolicy::Lenient);
        assert_eq!(DatePolicy::default(), DatePolicy::Strict);
    }

    #[test]
    fn unknown_names_fail_with_parse_error() {
        assert_eq!(
            DatePolicy::from_str("loose"),
            Err(strum::ParseError::VariantNotFound)
        );
        assert_eq!(
            Metric::from_str("Pieces"),
            Err(strum::ParseError::VariantNotFound)
        );
    }
}
