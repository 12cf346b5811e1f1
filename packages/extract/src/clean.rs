//! Conversion of raw records into typed records.
//!
//! Metric cells are coerced leniently: separators and currency symbols are
//! stripped and anything that still fails to parse becomes "not measured"
//! rather than aborting the row. Whole rows are only rejected when they
//! have no owner, or when strict date validation is on and the date token
//! is not a real `M/D/YYYY` date.

use std::sync::LazyLock;

use chrono::NaiveDate;
use prod_report_production_models::{
    DatePolicy, Metric, Metrics, REPORT_DATE_FORMAT, RawRecord, RecordDate, TypedRecord,
};
use regex::Regex;

use crate::token::{CURRENCY_SYMBOLS, THOUSANDS_SEPARATOR};

static STRICT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap_or_else(|_| unreachable!()));

/// Formats tried, in order, when dates are parsed leniently. Two-digit years
/// go first so that `1/5/25` is not read as the year 25.
const LENIENT_DATE_FORMATS: &[&str] = &["%m/%d/%y", REPORT_DATE_FORMAT, "%Y-%m-%d"];

/// Why a raw record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// No owner heading preceded the record.
    #[error("no owner heading precedes the record")]
    MissingOwner,

    /// The date token failed strict validation.
    #[error("invalid date {0:?}")]
    InvalidDate(String),
}

/// Typed records plus the counts of everything that was dropped or coerced.
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    /// Records that survived cleaning, in input order.
    pub records: Vec<TypedRecord>,
    /// Rows dropped for having no owner.
    pub missing_owner: usize,
    /// Rows dropped by strict date validation.
    pub invalid_date: usize,
    /// Non-empty metric cells that could not be parsed.
    pub unparseable_metrics: usize,
}

impl CleanOutcome {
    /// Total rows dropped.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.missing_owner + self.invalid_date
    }
}

/// Parses a metric cell such as `1,234` or `$4.50`.
///
/// Returns `None` for empty cells and for anything that is not a finite
/// number once thousands separators and currency symbols are removed.
#[must_use]
pub fn parse_metric(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|&c| c != THOUSANDS_SEPARATOR && !CURRENCY_SYMBOLS.contains(&c))
        .collect();
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a date token under the given policy.
///
/// # Errors
///
/// Returns [`Rejection::InvalidDate`] under [`DatePolicy::Strict`] when the
/// token is not a valid `M/D/YYYY` date. [`DatePolicy::Lenient`] never
/// fails.
pub fn parse_date(token: &str, policy: DatePolicy) -> Result<RecordDate, Rejection> {
    match policy {
        DatePolicy::Strict => {
            if !STRICT_DATE_RE.is_match(token) {
                return Err(Rejection::InvalidDate(token.to_owned()));
            }
            NaiveDate::parse_from_str(token, REPORT_DATE_FORMAT)
                .map(RecordDate::Parsed)
                .map_err(|_| Rejection::InvalidDate(token.to_owned()))
        }
        DatePolicy::Lenient => Ok(LENIENT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
            .map_or_else(|| RecordDate::Unknown(token.to_owned()), RecordDate::Parsed)),
    }
}

/// Cleans a single raw record.
///
/// # Errors
///
/// Returns a [`Rejection`] if the record has no owner or, in strict mode,
/// an invalid date.
pub fn clean(raw: RawRecord, policy: DatePolicy) -> Result<TypedRecord, Rejection> {
    clean_counting(raw, policy).map(|(record, _)| record)
}

/// Cleans a record and also returns how many non-empty metric cells failed
/// to parse.
fn clean_counting(raw: RawRecord, policy: DatePolicy) -> Result<(TypedRecord, usize), Rejection> {
    let owner = match raw.owner.as_deref().map(str::trim) {
        Some(owner) if !owner.is_empty() => owner.to_owned(),
        _ => return Err(Rejection::MissingOwner),
    };
    let date = parse_date(&raw.date, policy)?;

    let mut metrics = Metrics::default();
    let mut unparseable = 0;
    for metric in Metric::ALL {
        let text = raw.metric_text(metric);
        let value = parse_metric(text);
        if value.is_none() && !text.trim().is_empty() {
            unparseable += 1;
        }
        metrics.set(metric, value);
    }

    Ok((
        TypedRecord {
            owner,
            date,
            location: raw.location,
            metrics,
            ambiguities: raw.ambiguities,
        },
        unparseable,
    ))
}

/// Cleans every raw record, dropping rejected rows and counting what was
/// dropped or coerced. Counts are logged once at the end.
#[must_use]
pub fn clean_all(raws: Vec<RawRecord>, policy: DatePolicy) -> CleanOutcome {
    let mut outcome = CleanOutcome {
        records: Vec::with_capacity(raws.len()),
        ..CleanOutcome::default()
    };

    for raw in raws {
        match clean_counting(raw, policy) {
            Ok((record, unparseable)) => {
                outcome.unparseable_metrics += unparseable;
                outcome.records.push(record);
            }
            Err(Rejection::MissingOwner) => outcome.missing_owner += 1,
            Err(Rejection::InvalidDate(_)) => outcome.invalid_date += 1,
        }
    }

    log::info!(
        "Cleaned {} records ({policy} dates); {} rejected",
        outcome.records.len(),
        outcome.rejected(),
    );
    if outcome.missing_owner > 0 {
        log::warn!("{} rows dropped: no owner heading", outcome.missing_owner);
    }
    if outcome.invalid_date > 0 {
        log::warn!("{} rows dropped: invalid date", outcome.invalid_date);
    }
    if outcome.unparseable_metrics > 0 {
        log::warn!(
            "{} metric cells could not be parsed and were left empty",
            outcome.unparseable_metrics
        );
    }

    outcome
}
