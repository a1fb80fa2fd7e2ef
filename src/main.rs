use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use budget_tracker::cli::{
    handle_audit_command, handle_category_command, handle_export_command, handle_fy_command,
    handle_import_command, handle_report_command, handle_summary_command, handle_template_command,
    handle_threshold_command, handle_transaction_command, handle_user_command, handle_years_command,
};
use budget_tracker::config::{paths::BudgetPaths, settings::Settings};
use budget_tracker::identity::LocalIdentity;
use budget_tracker::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Personal budget tracker with financial-year reports",
    long_about = "Budget Tracker records income and expenses against budgeted \
                  categories and reports on them per July-to-June financial year."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new budget with the default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(budget_tracker::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(budget_tracker::cli::TransactionCommands),

    /// Import transactions from a CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Write a CSV import template
    Template {
        /// Output file path
        #[arg(default_value = "budget_import_template.csv")]
        output: PathBuf,
    },

    /// Financial year summary: totals, utilization and category budgets
    Summary {
        /// Financial year (e.g. "2024-2025"); defaults to the selected year
        #[arg(long)]
        fy: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Monthly and detailed reports
    #[command(subcommand)]
    Report(budget_tracker::cli::ReportCommands),

    /// List the financial years available for selection
    Years,

    /// Show or select the financial year (e.g. "2024-2025")
    Fy {
        label: Option<String>,
    },

    /// Show or set the large-transaction alert threshold
    Threshold {
        amount: Option<String>,
    },

    /// Export data
    #[command(subcommand)]
    Export(budget_tracker::cli::ExportCommands),

    /// User and session commands
    #[command(subcommand)]
    User(budget_tracker::cli::UserCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    // Initialize paths and settings
    let paths = BudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.set_audit_enabled(settings.audit_enabled);
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Budget Tracker at: {}", paths.base_dir().display());
            if initialize_storage(&paths, Local::now().date_naive())? {
                println!("Initialization complete!");
                println!();
                println!("Default categories have been created:");
                println!("  - Income: Salary, Freelance, Investments, Other Income");
                println!("  - Expense: Housing, Transportation, Food, Utilities, Entertainment,");
                println!("    Healthcare, Shopping, Other Expenses");
                println!();
                println!("Run 'budget category list' to see all categories.");
            } else {
                println!("Already initialized; nothing to do.");
            }
        }
        Some(Commands::Config) => {
            println!("Budget Tracker Configuration");
            println!("============================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data file:       {}", paths.snapshot_file().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Import date format: {}", settings.import_date_format);
            println!("  Audit logging:      {}", settings.audit_enabled);
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import { file }) => {
            handle_import_command(&storage, &settings, &file)?;
        }
        Some(Commands::Template { output }) => {
            handle_template_command(&storage, &output)?;
        }
        Some(Commands::Summary { fy, output }) => {
            handle_summary_command(&storage, &settings, fy.as_deref(), output.as_deref())?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Years) => {
            handle_years_command(&storage)?;
        }
        Some(Commands::Fy { label }) => {
            handle_fy_command(&storage, label.as_deref())?;
        }
        Some(Commands::Threshold { amount }) => {
            handle_threshold_command(&storage, &settings, amount.as_deref())?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::User(cmd)) => {
            let identity = LocalIdentity::new(paths.clone(), storage.audit().clone());
            handle_user_command(&identity, cmd)?;
        }
        Some(Commands::Audit { count }) => {
            handle_audit_command(&storage, count)?;
        }
        None => {
            println!("Budget Tracker - personal budgeting by financial year");
            println!();
            println!("Run 'budget --help' for usage information.");
            println!("Run 'budget init' to get started.");
        }
    }

    Ok(())
}
