//! Menu-driven front end.
//!
//! Prompts for the same choices the subcommands take, using `dialoguer`,
//! for users who would rather not remember flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use prod_report_analytics_models::SearchCriteria;

use crate::commands::{self, Context, OutputFormat, SortArg};
use crate::pipeline::SummaryRequest;

/// Top-level actions in the interactive menu.
enum Action {
    Summarize,
    Rank,
    Extract,
    Split,
    CallIns,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Summarize,
        Self::Rank,
        Self::Extract,
        Self::Split,
        Self::CallIns,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summarize => "Summarize production by employee or store",
            Self::Rank => "Rank employees by Pieces/Hr",
            Self::Extract => "Extract records to CSV",
            Self::Split => "Split records into one CSV per employee",
            Self::CallIns => "Rank call-in points",
        }
    }
}

impl SortArg {
    const ALL: &[Self] = &[Self::Alpha, Self::Pieces, Self::Dollars, Self::Skus];

    const fn label(self) -> &'static str {
        match self {
            Self::Alpha => "Alphabetical",
            Self::Pieces => "Pieces/Hr (highest first)",
            Self::Dollars => "$/Hr (highest first)",
            Self::Skus => "Skus/Hr (highest first)",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Summarize => summarize(ctx)?,
        Action::Rank => {
            let inputs = prompt_inputs()?;
            print!("{}", commands::rank(ctx, &inputs, None, OutputFormat::Text)?);
        }
        Action::Extract => {
            let inputs = prompt_inputs()?;
            let output: String = Input::new()
                .with_prompt("Output CSV path")
                .default("EmployeeProduction.csv".to_string())
                .interact_text()?;
            let count = commands::extract(ctx, &inputs, &PathBuf::from(output))?;
            println!("Wrote {count} records.");
        }
        Action::Split => {
            let inputs = prompt_inputs()?;
            let output: String = Input::new()
                .with_prompt("Output directory")
                .default("EmployeeReports".to_string())
                .interact_text()?;
            let paths = commands::split(ctx, &inputs, &PathBuf::from(output))?;
            println!("Wrote {} employee files.", paths.len());
        }
        Action::CallIns => {
            let input: String = Input::new()
                .with_prompt("Call-in report path")
                .interact_text()?;
            print!("{}", commands::call_ins(&PathBuf::from(input))?);
        }
    }

    Ok(())
}

/// Prompts for search terms, ordering, and recency, then prints (and
/// optionally saves) the summary.
fn summarize(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = prompt_inputs()?;

    let employees: String = Input::new()
        .with_prompt("Employee names (comma-separated, blank for all)")
        .allow_empty(true)
        .interact_text()?;
    let stores: String = Input::new()
        .with_prompt("Store names or account groups (comma-separated, blank for all)")
        .allow_empty(true)
        .interact_text()?;

    let sort_labels: Vec<&str> = SortArg::ALL.iter().map(|s| s.label()).collect();
    let sort_idx = Select::new()
        .with_prompt("Sort individual averages by")
        .items(&sort_labels)
        .default(0)
        .interact()?;

    let recent_days = prompt_optional_u32("Only employees active in the last N days (empty for all)")?;

    let request = SummaryRequest {
        criteria: SearchCriteria::from_lists(&employees, &stores),
        group_by: None,
        order: SortArg::ALL[sort_idx].into(),
        recent_days: ctx.recent_days(recent_days),
        today: ctx.today,
    };
    let summary = commands::summarize(ctx, &inputs, &request)?;

    if summary.records.is_empty() {
        println!("No records found for the given search criteria.");
        return Ok(());
    }

    print!("{}", commands::format_summary(&summary, OutputFormat::Text)?);

    let save = Confirm::new()
        .with_prompt("Save this report?")
        .default(false)
        .interact()?;
    if save {
        let dir: String = Input::new()
            .with_prompt("Output directory")
            .default("SearchedProductionReports".to_string())
            .interact_text()?;
        let path = commands::save_summary(&summary, OutputFormat::Text, &PathBuf::from(dir))?;
        println!("Report created: {}", path.display());
    }

    Ok(())
}

/// Prompts for one or more comma-separated input paths.
fn prompt_inputs() -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let raw: String = Input::new()
        .with_prompt("Report file(s) (PDF, text, or CSV; comma-separated)")
        .interact_text()?;

    let inputs: Vec<PathBuf> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();
    if inputs.is_empty() {
        return Err("no report files given".into());
    }
    Ok(inputs)
}

fn prompt_optional_u32(prompt: &str) -> Result<Option<u32>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.trim().parse()?))
    }
}
