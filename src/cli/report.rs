//! CLI commands for reports
//!
//! Provides commands for generating and exporting financial-year reports.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::{resolve_financial_year, TypeArg};
use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::reports::{DetailedReport, MonthlyReport, ReportFilter, SummaryReport};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income and expenses for each month of the financial year
    Monthly {
        /// Financial year (e.g. "2024-2025"); defaults to the selected year
        #[arg(long)]
        fy: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transaction-level report with budget variance and a category summary
    Detailed {
        /// Financial year (e.g. "2024-2025"); defaults to the selected year
        #[arg(long)]
        fy: Option<String>,

        /// Calendar month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Category name
        #[arg(short, long)]
        category: Option<String>,

        /// Income or expense
        #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
        kind: Option<TypeArg>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle the summary command
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    fy: Option<&str>,
    output: Option<&Path>,
) -> BudgetResult<()> {
    let fy = resolve_financial_year(storage, fy)?;
    let report = SummaryReport::generate(storage, fy)?;

    if let Some(path) = output {
        let mut writer = BufWriter::new(File::create(path)?);
        report.export_csv(&mut writer)?;
        println!("Summary exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> BudgetResult<()> {
    match cmd {
        ReportCommands::Monthly { fy, output } => {
            let fy = resolve_financial_year(storage, fy.as_deref())?;
            let report = MonthlyReport::generate(storage, fy)?;

            if let Some(path) = output {
                let mut writer = BufWriter::new(File::create(&path)?);
                report.export_csv(&mut writer)?;
                println!("Monthly report exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal(&settings.currency_symbol));
            }
        }

        ReportCommands::Detailed {
            fy,
            month,
            category,
            kind,
            output,
        } => {
            let fy = resolve_financial_year(storage, fy.as_deref())?;
            if let Some(m) = &month {
                validate_month(m)?;
            }

            let filter = ReportFilter {
                month,
                category,
                transaction_type: kind.map(Into::into),
            };
            let report =
                DetailedReport::generate(storage, fy, filter, Local::now().date_naive())?;

            if let Some(path) = output {
                let mut writer = BufWriter::new(File::create(&path)?);
                report.export_csv(&mut writer)?;
                println!("Detailed report exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal(&settings.currency_symbol));
            }
        }
    }

    Ok(())
}

fn validate_month(month: &str) -> BudgetResult<()> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| BudgetError::Validation(format!("Invalid month '{}': expected YYYY-MM", month)))
}
