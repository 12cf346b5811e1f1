//! Trailing-window employee filter.
//!
//! An employee qualifies when at least one of their records falls inside the
//! window. Qualifying employees keep their whole history; everyone else is
//! dropped entirely.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use prod_report_production_models::TypedRecord;

/// Keeps only the records of owners with a record dated on or after
/// `today - window_days`.
///
/// Records with an unknown date never qualify their owner, but are kept if
/// the owner qualifies through another record. Input order is preserved.
#[must_use]
pub fn filter_recent(
    records: Vec<TypedRecord>,
    window_days: u32,
    today: NaiveDate,
) -> Vec<TypedRecord> {
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);

    let recent_owners: BTreeSet<String> = records
        .iter()
        .filter(|r| r.date.as_date().is_some_and(|d| d >= cutoff))
        .map(|r| r.owner.clone())
        .collect();

    let before = records.len();
    let kept: Vec<TypedRecord> = records
        .into_iter()
        .filter(|r| recent_owners.contains(&r.owner))
        .collect();

    log::info!(
        "{} employees active since {cutoff}; kept {} of {before} records",
        recent_owners.len(),
        kept.len()
    );

    kept
}

#[cfg(test)]
mod tests {
    use prod_report_production_models::{Metrics, RecordDate};

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(owner: &str, date: RecordDate) -> TypedRecord {
        TypedRecord {
            owner: owner.to_owned(),
            date,
            location: "Store".to_owned(),
            metrics: Metrics::default(),
            ambiguities: Vec::new(),
        }
    }

    #[test]
    fn keeps_full_history_of_recent_owners() {
        let records = vec![
            record("Ann", RecordDate::Parsed(day(2024, 1, 2))),
            record("Bob", RecordDate::Parsed(day(2024, 1, 2))),
            record("Ann", RecordDate::Parsed(day(2025, 3, 1))),
        ];
        let kept = filter_recent(records, 30, day(2025, 3, 10));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.owner == "Ann"));
        assert_eq!(kept[0].date, RecordDate::Parsed(day(2024, 1, 2)));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let records = vec![record("Ann", RecordDate::Parsed(day(2025, 2, 8)))];
        assert_eq!(filter_recent(records, 30, day(2025, 3, 10)).len(), 1);
    }

    #[test]
    fn unknown_dates_do_not_qualify() {
        let records = vec![
            record("Ann", RecordDate::Unknown("??".to_owned())),
            record("Bob", RecordDate::Unknown("??".to_owned())),
            record("Bob", RecordDate::Parsed(day(2025, 3, 9))),
        ];
        let kept = filter_recent(records, 7, day(2025, 3, 10));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.owner == "Bob"));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(filter_recent(Vec::new(), 7, day(2025, 3, 10)).is_empty());
    }
}
