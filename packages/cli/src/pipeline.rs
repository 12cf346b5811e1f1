//! Input loading and the filter → aggregate pipeline.
//!
//! Each input is one full document: `.csv` files go through the CSV
//! importer, anything else through page loading and the extraction pass.
//! The owner context starts fresh for every document.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use prod_report_analytics::{aggregate, filter_recent, filter_records};
use prod_report_analytics_models::{
    AccountGroups, AggregateReport, GroupBy, SearchCriteria, SortOrder,
};
use prod_report_export::ExportError;
use prod_report_export::csv_file::read_records_from_path;
use prod_report_export::render::{TextReport, below_average};
use prod_report_extract::pages::load_pages;
use prod_report_extract::progress::ProgressCallback;
use prod_report_extract::{
    CleanOutcome, ExtractError, ExtractOptions, LineClassifier, clean_all, extract_pages,
};
use prod_report_production_models::{Metric, TypedRecord};

/// Errors that can occur while loading inputs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A report document could not be read or extracted.
    #[error("{}: {source}", path.display())]
    Extract {
        /// Input that failed.
        path: PathBuf,
        /// Underlying error.
        source: ExtractError,
    },

    /// A CSV input could not be read.
    #[error("{}: {source}", path.display())]
    Csv {
        /// Input that failed.
        path: PathBuf,
        /// Underlying error.
        source: ExportError,
    },
}

/// Returns `true` if the path has a `.csv` extension (any case).
#[must_use]
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Extracts and cleans the records of one page sequence.
#[must_use]
pub fn records_from_pages<S: AsRef<str>>(pages: &[S], options: &ExtractOptions) -> CleanOutcome {
    let classifier = LineClassifier::new(&options.header_fragments);
    let extraction = extract_pages(pages, &classifier);
    clean_all(extraction.records, options.date_policy)
}

/// Loads and cleans the records of one input file.
///
/// # Errors
///
/// Returns [`PipelineError`] if the file cannot be read or parsed.
pub fn load_input(path: &Path, options: &ExtractOptions) -> Result<CleanOutcome, PipelineError> {
    if is_csv(path) {
        return read_records_from_path(path, options.date_policy).map_err(|source| {
            PipelineError::Csv {
                path: path.to_path_buf(),
                source,
            }
        });
    }

    let pages = load_pages(path).map_err(|source| PipelineError::Extract {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(records_from_pages(&pages, options))
}

/// Loads every input in order and concatenates their records.
///
/// # Errors
///
/// Returns [`PipelineError`] for the first input that fails.
pub fn load_inputs(
    paths: &[PathBuf],
    options: &ExtractOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<TypedRecord>, PipelineError> {
    progress.set_total(paths.len() as u64);

    let mut records = Vec::new();
    let mut rejected = 0;

    for path in paths {
        progress.set_message(format!("Reading {}", path.display()));
        let outcome = load_input(path, options)?;
        rejected += outcome.rejected();
        records.extend(outcome.records);
        progress.inc(1);
    }

    progress.finish(format!(
        "Loaded {} records from {} files",
        records.len(),
        paths.len()
    ));
    if rejected > 0 {
        log::warn!("{rejected} rows were rejected across all inputs");
    }
    let uncertain = records.iter().filter(|r| !r.is_confident()).count();
    if uncertain > 0 {
        log::warn!("{uncertain} records have at least one guessed column");
    }

    Ok(records)
}

/// What to summarize and how.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// Employee and store filters, before account group expansion.
    pub criteria: SearchCriteria,
    /// Grouping key; `None` picks [`SearchCriteria::default_group_by`].
    pub group_by: Option<GroupBy>,
    /// Group ordering.
    pub order: SortOrder,
    /// Keep only employees active in this many trailing days.
    pub recent_days: Option<u32>,
    /// Reference date for the recency window.
    pub today: NaiveDate,
}

/// Filtered records and their aggregate.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Criteria after account group expansion.
    pub criteria: SearchCriteria,
    /// Records that passed every filter.
    pub records: Vec<TypedRecord>,
    /// Averages over `records`.
    pub report: AggregateReport,
}

impl Summary {
    /// The metric whose below-average groups are highlighted: the sort
    /// metric, or Pieces/Hr for alphabetical order.
    #[must_use]
    pub const fn highlight_metric(&self) -> Metric {
        match self.report.order {
            SortOrder::MetricDescending(metric) => metric,
            SortOrder::KeyAscending => Metric::Pieces,
        }
    }

    /// Renders criteria, averages, and detail tables as text.
    ///
    /// # Errors
    ///
    /// Returns [`fmt::Error`] if rendering fails.
    pub fn to_text(&self) -> Result<String, fmt::Error> {
        let report = TextReport::new(self.report.group_by)
            .with_highlight(below_average(self.highlight_metric(), &self.report.grand));
        let mut out = String::new();
        report.write_report(&mut out, &self.criteria, &self.report, &self.records)?;
        Ok(out)
    }
}

/// Filters records by search criteria and recency, then aggregates them.
#[must_use]
pub fn summarize(
    records: Vec<TypedRecord>,
    request: &SummaryRequest,
    account_groups: &AccountGroups,
) -> Summary {
    let criteria = request.criteria.clone().expand_stores(account_groups);
    let mut records = filter_records(records, &criteria);
    if let Some(days) = request.recent_days {
        records = filter_recent(records, days, request.today);
    }

    let group_by = request
        .group_by
        .unwrap_or_else(|| criteria.default_group_by());
    let report = aggregate(&records, group_by, request.order);

    Summary {
        criteria,
        records,
        report,
    }
}

#[cfg(test)]
mod tests {
    use prod_report_extract::progress::null_progress;
    use prod_report_production_models::DatePolicy;

    use super::*;

    const JOHN_SMITH: &str = "John Smith\n\
                              01/05/2025 Main St 100 $4.00 40\n\
                              01/06/2025 Oak St 120 $4.50 45\n";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn request(criteria: SearchCriteria) -> SummaryRequest {
        SummaryRequest {
            criteria,
            group_by: None,
            order: SortOrder::KeyAscending,
            recent_days: None,
            today: today(),
        }
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!((actual - expected).abs() < f64::EPSILON, "expected {expected}, got {actual}");
    }

    #[test]
    fn end_to_end_owner_summary() {
        let outcome = records_from_pages(&[JOHN_SMITH], &ExtractOptions::default());
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.iter().all(|r| r.owner == "John Smith"));

        let summary = summarize(
            outcome.records,
            &request(SearchCriteria::default()),
            &AccountGroups::new(),
        );
        let group = &summary.report.groups[0];
        assert_eq!(summary.report.group_by, GroupBy::Owner);
        assert_eq!(group.group_key, "John Smith");
        assert_close(group.averages.pieces, 110.0);
        assert_close(group.averages.dollars, 4.25);
        assert_close(group.averages.skus, 42.5);
        assert_eq!(group.member_count, 2);
    }

    #[test]
    fn owner_carries_across_pages() {
        let pages = ["Alice\n03/01/2025 StoreA 100 $5.00 50", "03/02/2025 StoreB 110 $5.50 55"];
        let outcome = records_from_pages(&pages, &ExtractOptions::default());
        let owners: Vec<_> = outcome.records.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["Alice", "Alice"]);
    }

    #[test]
    fn extraction_and_aggregation_are_idempotent() {
        let text = format!("{JOHN_SMITH}Jane Roe\n01/07/2025 Pick 5 90 $9.00 30\n");
        let run = || {
            let records = records_from_pages(&[text.as_str()], &ExtractOptions::default()).records;
            summarize(records, &request(SearchCriteria::default()), &AccountGroups::new()).report
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn employee_search_groups_by_store() {
        let records = records_from_pages(&[JOHN_SMITH], &ExtractOptions::default()).records;
        let summary = summarize(
            records,
            &request(SearchCriteria::from_lists("john", "")),
            &AccountGroups::new(),
        );
        assert_eq!(summary.report.group_by, GroupBy::Location);
        assert_eq!(summary.report.groups.len(), 2);
    }

    #[test]
    fn store_search_expands_account_groups() {
        let text = "Jane Roe\n01/07/2025 Pick N Save 90 $9.00 30\n01/08/2025 Target 80 $8.00 20\n";
        let records = records_from_pages(&[text], &ExtractOptions::default()).records;
        let mut groups = AccountGroups::new();
        groups.insert("kroger".to_owned(), vec!["pick".to_owned()]);

        let summary = summarize(records, &request(SearchCriteria::from_lists("", "Kroger")), &groups);
        assert_eq!(summary.criteria.stores, vec!["pick"]);
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].location, "Pick N Save");
    }

    #[test]
    fn recency_window_drops_inactive_employees() {
        let text = format!("{JOHN_SMITH}Old Timer\n06/01/2024 Main St 10 $1.00 1\n");
        let records = records_from_pages(&[text.as_str()], &ExtractOptions::default()).records;
        let mut req = request(SearchCriteria::default());
        req.recent_days = Some(30);

        let summary = summarize(records, &req, &AccountGroups::new());
        let keys: Vec<_> = summary.report.groups.iter().map(|g| g.group_key.as_str()).collect();
        assert_eq!(keys, vec!["John Smith"]);
    }

    #[test]
    fn empty_input_is_an_empty_summary() {
        let pages: [&str; 0] = [];
        let records = records_from_pages(&pages, &ExtractOptions::default()).records;
        let summary = summarize(records, &request(SearchCriteria::default()), &AccountGroups::new());
        assert!(summary.report.is_empty());
        assert!(summary.to_text().unwrap().contains("Pieces/Hr: No Data"));
    }

    #[test]
    fn lenient_policy_keeps_bad_dates() {
        let text = "Jane Roe\n13/45/2025 Main St 10 $1.00 1\n";
        let strict = records_from_pages(&[text], &ExtractOptions::default());
        assert!(strict.records.is_empty());
        assert_eq!(strict.invalid_date, 1);

        let lenient = records_from_pages(
            &[text],
            &ExtractOptions::default().with_date_policy(DatePolicy::Lenient),
        );
        assert_eq!(lenient.records.len(), 1);
        assert_eq!(lenient.records[0].date.as_date(), None);
    }

    #[test]
    fn loads_csv_and_text_inputs() {
        let dir = std::env::temp_dir().join(format!("prod_report_pipeline_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let text_path = dir.join("report.txt");
        let csv_path = dir.join("export.CSV");
        std::fs::write(&text_path, JOHN_SMITH).unwrap();
        std::fs::write(
            &csv_path,
            "Employee,Date,Store,Pieces/Hr,$/Hr,Skus/Hr\nJane Roe,01/07/2025,Pick,90,$9.00,30\n",
        )
        .unwrap();

        let records = load_inputs(
            &[text_path, csv_path],
            &ExtractOptions::default(),
            &null_progress(),
        )
        .unwrap();
        let owners: Vec<_> = records.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["John Smith", "John Smith", "Jane Roe"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[derive(Default)]
    struct RecordedProgress {
        events: std::sync::Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordedProgress {
        fn set_total(&self, total: u64) {
            self.events.lock().unwrap().push(format!("total {total}"));
        }

        fn inc(&self, delta: u64) {
            self.events.lock().unwrap().push(format!("inc {delta}"));
        }

        fn set_message(&self, _msg: String) {}

        fn finish(&self, msg: String) {
            self.events.lock().unwrap().push(msg);
        }
    }

    #[test]
    fn progress_counts_report_files() {
        let dir = std::env::temp_dir().join(format!("prod_report_progress_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("week1.txt");
        let second = dir.join("week2.txt");
        std::fs::write(&first, JOHN_SMITH).unwrap();
        std::fs::write(&second, "Jane Roe\n01/07/2025 Pick 90 $9.00 30\n").unwrap();

        let recorded = Arc::new(RecordedProgress::default());
        let progress: Arc<dyn ProgressCallback> = recorded.clone();
        load_inputs(&[first, second], &ExtractOptions::default(), &progress).unwrap();

        assert_eq!(
            *recorded.events.lock().unwrap(),
            vec!["total 2", "inc 1", "inc 1", "Loaded 3 records from 2 files"]
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_names_the_path() {
        let err = load_input(Path::new("/nonexistent/report.txt"), &ExtractOptions::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/report.txt"));
    }
}
