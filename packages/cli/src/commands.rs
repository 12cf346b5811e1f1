//! The operations behind each subcommand and interactive menu entry.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::ValueEnum;
use prod_report_analytics::{filter_recent, rank as rank_records};
use prod_report_analytics_models::{GroupBy, SortOrder};
use prod_report_cli_utils::{IndicatifProgress, MultiProgress};
use prod_report_export::csv_file::write_records_to_path;
use prod_report_export::render::{write_call_ins, write_ranking};
use prod_report_export::split::split_by_owner;
use prod_report_extract::ExtractOptions;
use prod_report_extract::call_ins::{parse_call_ins, rank_call_ins};
use prod_report_extract::pages::load_pages;
use prod_report_extract::progress::{ProgressCallback, null_progress};
use prod_report_production_models::{Metric, TypedRecord};

use crate::config::ReportConfig;
use crate::pipeline::{Summary, SummaryRequest, load_inputs, summarize as summarize_records};

type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// How summaries are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// File extension for saved reports.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// Grouping key as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupByArg {
    /// One row per employee.
    Employee,
    /// One row per store.
    Store,
}

impl From<GroupByArg> for GroupBy {
    fn from(value: GroupByArg) -> Self {
        match value {
            GroupByArg::Employee => Self::Owner,
            GroupByArg::Store => Self::Location,
        }
    }
}

/// Summary ordering as spelled on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Alphabetical by group name.
    #[default]
    Alpha,
    /// Pieces/Hr, highest first.
    Pieces,
    /// $/Hr, highest first.
    Dollars,
    /// Skus/Hr, highest first.
    Skus,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Alpha => Self::KeyAscending,
            SortArg::Pieces => Self::MetricDescending(Metric::Pieces),
            SortArg::Dollars => Self::MetricDescending(Metric::Dollars),
            SortArg::Skus => Self::MetricDescending(Metric::Skus),
        }
    }
}

/// Shared state for one invocation.
pub struct Context {
    /// Loaded configuration.
    pub config: ReportConfig,
    /// Extraction options after command-line overrides.
    pub options: ExtractOptions,
    /// Where progress bars are drawn.
    pub multi: MultiProgress,
    /// Reference date for recency windows.
    pub today: NaiveDate,
}

impl Context {
    /// Creates a context dated today.
    #[must_use]
    pub fn new(config: ReportConfig, multi: MultiProgress) -> Self {
        let options = config.extract_options();
        Self {
            config,
            options,
            multi,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// A progress bar when there is more than one input, otherwise nothing.
    fn progress(&self, inputs: &[PathBuf]) -> Arc<dyn ProgressCallback> {
        if inputs.len() > 1 {
            IndicatifProgress::report_files_bar(&self.multi, "Reading reports")
        } else {
            null_progress()
        }
    }

    /// Loads every input with this context's options.
    ///
    /// # Errors
    ///
    /// Returns an error for the first input that cannot be loaded.
    pub fn load(&self, inputs: &[PathBuf]) -> CommandResult<Vec<TypedRecord>> {
        Ok(load_inputs(inputs, &self.options, &self.progress(inputs))?)
    }

    /// The recency window to apply: the command-line value, else the
    /// configured one.
    #[must_use]
    pub fn recent_days(&self, requested: Option<u32>) -> Option<u32> {
        requested.or(self.config.recency.window_days)
    }
}

/// Extracts records from every input into one CSV file.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the CSV cannot be
/// written.
pub fn extract(ctx: &Context, inputs: &[PathBuf], output: &Path) -> CommandResult<usize> {
    let records = ctx.load(inputs)?;
    Ok(write_records_to_path(&records, output)?)
}

/// Filters and aggregates the inputs.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded.
pub fn summarize(ctx: &Context, inputs: &[PathBuf], request: &SummaryRequest) -> CommandResult<Summary> {
    let records = ctx.load(inputs)?;
    Ok(summarize_records(records, request, &ctx.config.account_groups))
}

/// Formats a summary as text or JSON.
///
/// # Errors
///
/// Returns an error if rendering or serialization fails.
pub fn format_summary(summary: &Summary, format: OutputFormat) -> CommandResult<String> {
    Ok(match format {
        OutputFormat::Text => summary.to_text()?,
        OutputFormat::Json => serde_json::to_string_pretty(&summary.report)?,
    })
}

/// Writes a formatted summary to `{dir}/{criteria stem}.{ext}`.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_summary(summary: &Summary, format: OutputFormat, dir: &Path) -> CommandResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "{}.{}",
        summary.criteria.file_stem(),
        format.extension()
    ));
    std::fs::write(&path, format_summary(summary, format)?)?;
    log::info!("Report written to {}", path.display());
    Ok(path)
}

/// Ranks employees by average Pieces/Hr.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the output cannot be
/// rendered.
pub fn rank(
    ctx: &Context,
    inputs: &[PathBuf],
    recent_days: Option<u32>,
    format: OutputFormat,
) -> CommandResult<String> {
    let mut records = ctx.load(inputs)?;
    if let Some(days) = ctx.recent_days(recent_days) {
        records = filter_recent(records, days, ctx.today);
    }
    let report = rank_records(&records);

    Ok(match format {
        OutputFormat::Text => {
            let mut out = String::new();
            write_ranking(&mut out, &report)?;
            out
        }
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    })
}

/// Writes one CSV per employee into `output_dir`.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or a file cannot be
/// written.
pub fn split(ctx: &Context, inputs: &[PathBuf], output_dir: &Path) -> CommandResult<Vec<PathBuf>> {
    let records = ctx.load(inputs)?;
    Ok(split_by_owner(&records, output_dir)?)
}

/// Parses a call-in report and lists employees by points, highest first.
///
/// # Errors
///
/// Returns an error if the report cannot be read.
pub fn call_ins(input: &Path) -> CommandResult<String> {
    let text = load_pages(input)?.join("\n");
    let mut report = parse_call_ins(&text);
    rank_call_ins(&mut report.entries);

    let mut out = String::new();
    write_call_ins(&mut out, &report.entries)?;
    if report.skipped > 0 {
        writeln!(out, "\n({} lines with unreadable points skipped)", report.skipped)?;
    }
    Ok(out)
}
