#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the production report tools.
//!
//! Uses `indicatif-log-bridge` (via [`prod_report_cli_utils::init_logger`])
//! so log lines and progress bars never fight for the terminal.

use std::path::PathBuf;
use std::str::FromStr as _;

use clap::{Parser, Subcommand};
use prod_report_analytics_models::SearchCriteria;
use prod_report_cli::commands::{self, Context, GroupByArg, OutputFormat, SortArg};
use prod_report_cli::config::ReportConfig;
use prod_report_cli::interactive;
use prod_report_cli::pipeline::SummaryRequest;
use prod_report_production_models::DatePolicy;

#[derive(Parser)]
#[command(name = "prod_report", about = "Employee production report tools")]
struct Cli {
    /// Config file (overrides `PROD_REPORT_CONFIG` and the built-in default)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Date validation: "strict" drops rows with bad dates, "lenient" keeps
    /// them with the date marked unknown
    #[arg(long, global = true, value_parser = parse_date_policy)]
    date_policy: Option<DatePolicy>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from report PDFs or text into one CSV file
    Extract {
        /// Report files (PDF, form-feed separated text, or CSV)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// CSV file to write
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Summarize average production by employee or store
    Summarize {
        /// Report files (PDF, form-feed separated text, or CSV)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Comma-separated employee name fragments
        #[arg(long, default_value = "")]
        employees: String,
        /// Comma-separated store name fragments or account group names
        #[arg(long, default_value = "")]
        stores: String,
        /// Group by employee or store (default: store when employees are
        /// given, employee otherwise)
        #[arg(long, value_enum)]
        group_by: Option<GroupByArg>,
        /// Order of the individual averages
        #[arg(long, value_enum, default_value_t = SortArg::Alpha)]
        sort: SortArg,
        /// Only include employees with a record in the last N days
        #[arg(long)]
        recent_days: Option<u32>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Also save the report in this directory, named after the search
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Rank employees by average Pieces/Hr
    Rank {
        /// Report files (PDF, form-feed separated text, or CSV)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Only include employees with a record in the last N days
        #[arg(long)]
        recent_days: Option<u32>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write one CSV file per employee
    Split {
        /// Report files (PDF, form-feed separated text, or CSV)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory to write `<Employee>_report.csv` files into
        #[arg(long, short)]
        output_dir: PathBuf,
    },
    /// Rank employees by call-in points
    CallIns {
        /// Call-in report (PDF or text)
        input: PathBuf,
    },
}

fn parse_date_policy(value: &str) -> Result<DatePolicy, String> {
    DatePolicy::from_str(value).map_err(|_| format!("expected \"strict\" or \"lenient\", got {value:?}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = prod_report_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = ReportConfig::load(cli.config.as_deref())?;
    let mut ctx = Context::new(config, multi);
    if let Some(policy) = cli.date_policy {
        ctx.options = ctx.options.with_date_policy(policy);
    }
    log::debug!("Date policy: {}", ctx.options.date_policy);

    let Some(command) = cli.command else {
        println!("Production Report Tools");
        println!();
        return interactive::run(&ctx);
    };

    match command {
        Commands::Extract { inputs, output } => {
            let count = commands::extract(&ctx, &inputs, &output)?;
            println!("Wrote {count} records to {}", output.display());
        }
        Commands::Summarize {
            inputs,
            employees,
            stores,
            group_by,
            sort,
            recent_days,
            format,
            output_dir,
        } => {
            let request = SummaryRequest {
                criteria: SearchCriteria::from_lists(&employees, &stores),
                group_by: group_by.map(Into::into),
                order: sort.into(),
                recent_days: ctx.recent_days(recent_days),
                today: ctx.today,
            };
            let summary = commands::summarize(&ctx, &inputs, &request)?;
            if summary.records.is_empty() {
                log::warn!("No records found for the given search criteria");
            }
            print!("{}", commands::format_summary(&summary, format)?);
            if let Some(dir) = output_dir {
                let path = commands::save_summary(&summary, format, &dir)?;
                println!("Report written to {}", path.display());
            }
        }
        Commands::Rank {
            inputs,
            recent_days,
            format,
        } => {
            print!("{}", commands::rank(&ctx, &inputs, recent_days, format)?);
        }
        Commands::Split { inputs, output_dir } => {
            let paths = commands::split(&ctx, &inputs, &output_dir)?;
            println!("Wrote {} employee files to {}", paths.len(), output_dir.display());
        }
        Commands::CallIns { input } => {
            print!("{}", commands::call_ins(&input)?);
        }
    }

    Ok(())
}
