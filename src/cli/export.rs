//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_full_json, export_full_yaml, export_transactions_csv};
use crate::reports::SummaryReport;
use crate::storage::Storage;
use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::resolve_financial_year;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (transactions only)
    Csv,
    /// JSON format (full state)
    Json,
    /// YAML format (full state, human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export transactions to CSV in the import layout
    Transactions {
        /// Output file path
        output: PathBuf,

        /// Only this financial year (e.g. "2024-2025")
        #[arg(long)]
        fy: Option<String>,
    },

    /// Export the financial year summary to CSV
    Report {
        /// Output file path
        output: PathBuf,

        /// Financial year (defaults to the selected year)
        #[arg(long)]
        fy: Option<String>,
    },
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> BudgetResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => handle_export_all(storage, &output, format, pretty),
        ExportCommands::Transactions { output, fy } => {
            handle_export_transactions(storage, &output, fy.as_deref())
        }
        ExportCommands::Report { output, fy } => handle_export_report(storage, &output, fy.as_deref()),
    }
}

fn create_output(output: &Path) -> BudgetResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        BudgetError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle full export
fn handle_export_all(
    storage: &Storage,
    output: &Path,
    format: ExportFormat,
    pretty: bool,
) -> BudgetResult<()> {
    let mut writer = create_output(output)?;

    match format {
        ExportFormat::Csv => {
            let count = export_transactions_csv(storage, &mut writer, None)?;
            println!("{} transaction(s) exported to: {}", count, output.display());
            println!("Note: CSV format exports transactions only. Use JSON or YAML for a full export.");
        }
        ExportFormat::Json => {
            export_full_json(storage, &mut writer, pretty)?;
            println!("Full export written to: {}", output.display());
        }
        ExportFormat::Yaml => {
            export_full_yaml(storage, &mut writer)?;
            println!("Full export written to: {}", output.display());
        }
    }

    Ok(())
}

/// Handle transactions export
fn handle_export_transactions(
    storage: &Storage,
    output: &Path,
    fy: Option<&str>,
) -> BudgetResult<()> {
    let fy = fy.map(|label| resolve_financial_year(storage, Some(label))).transpose()?;
    let mut writer = create_output(output)?;

    let count = export_transactions_csv(storage, &mut writer, fy)?;
    println!("{} transaction(s) exported to: {}", count, output.display());
    Ok(())
}

/// Handle summary report export
fn handle_export_report(storage: &Storage, output: &Path, fy: Option<&str>) -> BudgetResult<()> {
    let fy = resolve_financial_year(storage, fy)?;
    let report = SummaryReport::generate(storage, fy)?;
    let mut writer = create_output(output)?;

    report.export_csv(&mut writer)?;
    println!("Summary for FY {} exported to: {}", fy, output.display());
    Ok(())
}
