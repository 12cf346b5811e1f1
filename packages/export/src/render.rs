//! Plain-text report rendering.
//!
//! [`TextReport`] renders every console table the tool prints: the account
//! averages, the per-group summary table, and detail tables grouped by
//! employee or store. Which summary rows are flagged is decided by a
//! highlight predicate, so "below average", "top N", or "nothing" are all
//! the same renderer.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use prod_report_analytics_models::{
    AggregateReport, GrandSummary, GroupBy, GroupSummary, SearchCriteria,
};
use prod_report_extract::call_ins::CallInEntry;
use prod_report_production_models::{Metric, TypedRecord};

/// Width of employee name cells.
pub const EMPLOYEE_WIDTH: usize = 25;
/// Width of store name cells.
pub const STORE_WIDTH: usize = 20;

const DATE_WIDTH: usize = 12;
const METRIC_WIDTH: usize = 11;

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Formats an average to two decimals, or `N/A` when there is no data.
#[must_use]
pub fn format_average(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| format!("{v:.2}"))
}

const fn label_width(group_by: GroupBy) -> usize {
    match group_by {
        GroupBy::Owner => EMPLOYEE_WIDTH,
        GroupBy::Location => STORE_WIDTH,
    }
}

/// Highlights groups whose average for `metric` is below the grand average.
///
/// Groups without data for the metric are never highlighted, and nothing is
/// highlighted when the grand average itself is missing.
#[must_use]
pub fn below_average(metric: Metric, grand: &GrandSummary) -> impl Fn(&GroupSummary) -> bool + use<> {
    let threshold = grand.averages.get(metric);
    move |group| match (group.averages.get(metric), threshold) {
        (Some(value), Some(threshold)) => value < threshold,
        _ => false,
    }
}

/// Writes the search criteria line; empty term lists read `All`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_criteria(out: &mut impl Write, criteria: &SearchCriteria) -> fmt::Result {
    let list = |terms: &[String]| {
        if terms.is_empty() {
            "All".to_owned()
        } else {
            terms.join(", ")
        }
    };
    writeln!(
        out,
        "Search Criteria: Employees: {}, Stores: {}",
        list(&criteria.employees),
        list(&criteria.stores)
    )
}

/// A console report keyed by employee or store.
pub struct TextReport<'a> {
    group_by: GroupBy,
    highlight: Box<dyn Fn(&GroupSummary) -> bool + 'a>,
}

impl std::fmt::Debug for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextReport")
            .field("group_by", &self.group_by)
            .finish_non_exhaustive()
    }
}

impl<'a> TextReport<'a> {
    /// Creates a report grouping detail tables by `group_by`, with no
    /// highlighted rows.
    #[must_use]
    pub fn new(group_by: GroupBy) -> Self {
        Self {
            group_by,
            highlight: Box::new(|_| false),
        }
    }

    /// Marks summary rows matching `predicate` with `*`.
    #[must_use]
    pub fn with_highlight(mut self, predicate: impl Fn(&GroupSummary) -> bool + 'a) -> Self {
        self.highlight = Box::new(predicate);
        self
    }

    /// Writes the account averages followed by one row per group.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn write_summary(&self, out: &mut impl Write, report: &AggregateReport) -> fmt::Result {
        writeln!(out, "Account Averages:")?;
        for metric in Metric::ALL {
            match report.grand.averages.get(metric) {
                Some(value) => writeln!(out, "{metric}: {value:.2}")?,
                None => writeln!(out, "{metric}: No Data")?,
            }
        }
        writeln!(out)?;

        let width = label_width(report.group_by);
        writeln!(out, "Individual Averages ({}):", report.order)?;
        write!(out, "  {:<width$}", report.group_by.to_string())?;
        for metric in Metric::ALL {
            write!(out, " {:>METRIC_WIDTH$}", metric.to_string())?;
        }
        writeln!(out)?;

        for group in &report.groups {
            let marker = if (self.highlight)(group) { '*' } else { ' ' };
            write!(out, "{marker} {:<width$}", truncate_text(&group.group_key, width))?;
            for metric in Metric::ALL {
                write!(out, " {:>METRIC_WIDTH$}", format_average(group.averages.get(metric)))?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    /// Writes one detail table per group, groups in key order and rows in
    /// input order.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn write_details(&self, out: &mut impl Write, records: &[TypedRecord]) -> fmt::Result {
        let mut groups: BTreeMap<&str, Vec<&TypedRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(self.group_by.key_of(record)).or_default().push(record);
        }

        let other = self.group_by.counterpart();
        let width = label_width(other);

        for (key, rows) in groups {
            writeln!(out)?;
            writeln!(out, "{}: {key}", self.group_by)?;
            write!(out, "{:<DATE_WIDTH$} {:<width$}", "Date", other.to_string())?;
            for metric in Metric::ALL {
                write!(out, " {:>METRIC_WIDTH$}", metric.to_string())?;
            }
            writeln!(out)?;

            for record in rows {
                write!(
                    out,
                    "{:<DATE_WIDTH$} {:<width$}",
                    record.date.to_string(),
                    truncate_text(other.key_of(record), width)
                )?;
                for metric in Metric::ALL {
                    write!(out, " {:>METRIC_WIDTH$}", format_average(record.metrics.get(metric)))?;
                }
                writeln!(out)?;
            }
        }

        Ok(())
    }

    /// Writes criteria, summary, and details as one report.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn write_report(
        &self,
        out: &mut impl Write,
        criteria: &SearchCriteria,
        report: &AggregateReport,
        records: &[TypedRecord],
    ) -> fmt::Result {
        write_criteria(out, criteria)?;
        writeln!(out)?;
        self.write_summary(out, report)?;
        self.write_details(out, records)
    }
}

/// Writes a 1-based employee ranking by average Pieces/Hr.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_ranking(out: &mut impl Write, report: &AggregateReport) -> fmt::Result {
    writeln!(out, "Employee Ranking by Average Pieces/Hr")?;
    writeln!(out)?;
    writeln!(out, "Rank - Name - Average Pieces/Hr")?;
    for (rank, group) in report.groups.iter().enumerate() {
        writeln!(
            out,
            "{}. {} - {}",
            rank + 1,
            group.group_key,
            format_average(group.averages.pieces)
        )?;
    }
    writeln!(out)?;
    match report.grand.averages.pieces {
        Some(value) => writeln!(out, "Overall Average: {value:.2} Pieces/Hr"),
        None => writeln!(out, "Overall Average: No Data"),
    }
}

/// Writes ranked call-in entries as `Name: N points`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_call_ins(out: &mut impl Write, entries: &[CallInEntry]) -> fmt::Result {
    writeln!(out, "Employee Points Report")?;
    writeln!(out)?;
    for entry in entries {
        writeln!(out, "{}: {} points", entry.name, entry.points)?;
    }
    Ok(())
}
