//! Transaction CLI commands
//!
//! Implements CLI commands for recording and browsing transactions.

use chrono::Local;
use clap::Subcommand;

use super::{parse_amount, parse_date, resolve_financial_year, TypeArg};
use crate::config::settings::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::error::{BudgetError, BudgetResult};
use crate::services::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Amount (e.g., "45.50"); always positive
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Income or expense
        #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
        kind: TypeArg,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },

    /// List transactions, newest first
    List {
        /// Financial year (e.g. "2024-2025"); defaults to the selected year
        #[arg(long)]
        fy: Option<String>,
        /// Include every financial year
        #[arg(long, conflicts_with = "fy")]
        all: bool,
        /// Only income or only expenses
        #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
        kind: Option<TypeArg>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only this calendar month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Text to look for in descriptions (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Only transactions above the alert threshold
        #[arg(long)]
        flagged: bool,
        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID (full or short)
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID (full or short)
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New type
        #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
        kind: Option<TypeArg>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (full or short)
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let service = TransactionService::new(storage);
    let threshold = storage.preferences.alert_threshold()?;
    let currency = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let txn = service.create(CreateTransactionInput {
                date,
                description,
                amount: parse_amount(&amount)?,
                category,
                transaction_type: kind.into(),
            })?;

            println!(
                "Recorded {} of {}",
                txn.transaction_type,
                txn.amount.format_with_symbol(currency)
            );
            println!("  Date:     {}", txn.date.format(&settings.date_format));
            println!("  Category: {}", txn.category);
            println!("  ID:       {}", txn.id);
            if txn.exceeds_threshold(threshold) {
                println!(
                    "  Flagged:  over the alert threshold of {}",
                    threshold.format_with_symbol(currency)
                );
            }
        }

        TransactionCommands::List {
            fy,
            all,
            kind,
            category,
            month,
            search,
            flagged,
            limit,
        } => {
            let mut filter = TransactionFilter::new();
            if !all {
                filter = filter.financial_year(resolve_financial_year(storage, fy.as_deref())?);
            }
            if let Some(kind) = kind {
                filter = filter.transaction_type(kind.into());
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(month) = month {
                filter = filter.month(month);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }

            let mut transactions = service.list(&filter)?;
            if flagged {
                transactions.retain(|t| t.exceeds_threshold(threshold));
            }
            transactions.truncate(limit);

            println!(
                "{}",
                format_transaction_list(&transactions, threshold, &settings.date_format, currency)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| BudgetError::transaction_not_found(&id))?;
            print!("{}", format_transaction_details(&txn, threshold, currency));
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            kind,
            date,
            description,
        } => {
            if amount.is_none()
                && category.is_none()
                && kind.is_none()
                && date.is_none()
                && description.is_none()
            {
                println!(
                    "No changes specified. Use --amount, --category, --type, --date, or --description."
                );
                return Ok(());
            }

            let update = TransactionUpdate {
                date: date.as_deref().map(parse_date).transpose()?,
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                transaction_type: kind.map(Into::into),
            };

            let txn = service.update(&id, update)?;
            println!("Updated transaction {}", txn.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(&id)?;
            println!(
                "Deleted {} of {} on {} ({})",
                txn.transaction_type,
                txn.amount.format_with_symbol(currency),
                txn.date,
                txn.category
            );
        }
    }

    Ok(())
}
