//! Category CLI commands
//!
//! Implements CLI commands for budget category management.

use clap::Subcommand;

use super::{parse_amount, resolve_financial_year, TypeArg};
use crate::display::category::{
    format_category_budgets, format_category_details, format_category_list,
};
use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::services::aggregation::category_breakdown;
use crate::services::{CategoryService, CategoryUpdate};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List {
        /// Show budget, actual and remaining amounts
        #[arg(long)]
        usage: bool,
        /// Financial year for the usage columns, e.g. "2024-2025"
        #[arg(long)]
        fy: Option<String>,
    },

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Income or expense
        #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
        kind: TypeArg,
        /// Budget amount for the financial year (e.g., "500" or "500.00")
        #[arg(short, long, default_value = "0")]
        budget: String,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New type
        #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
        kind: Option<TypeArg>,
        /// New budget amount
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> BudgetResult<()> {
    let service = CategoryService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        CategoryCommands::List { usage, fy } => {
            if usage || fy.is_some() {
                let fy = resolve_financial_year(storage, fy.as_deref())?;
                let categories = service.list()?;
                let transactions = storage.transactions.get_all()?;
                println!("Budget usage for FY {}", fy);
                println!();
                println!(
                    "{}",
                    format_category_budgets(
                        &category_breakdown(&categories, &transactions, fy),
                        currency
                    )
                );
            } else {
                println!("{}", format_category_list(&service.list()?, currency));
            }
        }

        CategoryCommands::Add { name, kind, budget } => {
            let budget = parse_amount(&budget)?;
            let category = service.create(&name, kind.into(), budget)?;

            println!("Created category: {}", category.name);
            println!("  Type:   {}", category.category_type);
            println!("  Budget: {}", category.budget.format_with_symbol(currency));
            println!("  ID:     {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| BudgetError::category_not_found(&category))?;

            let fy = storage.preferences.financial_year()?;
            let categories = service.list()?;
            let transactions = storage.transactions.get_all()?;
            let usage = category_breakdown(&categories, &transactions, fy);
            let row = usage.iter().find(|r| r.name == cat.name);

            print!("{}", format_category_details(&cat, row, currency));
        }

        CategoryCommands::Edit {
            category,
            name,
            kind,
            budget,
        } => {
            if name.is_none() && kind.is_none() && budget.is_none() {
                println!("No changes specified. Use --name, --type, or --budget.");
                return Ok(());
            }

            let budget = budget.as_deref().map(parse_amount).transpose()?;
            let updated = service.update(
                &category,
                CategoryUpdate {
                    name,
                    category_type: kind.map(Into::into),
                    budget,
                },
            )?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let deleted = service.delete(&category)?;
            println!("Deleted category: {}", deleted.name);
            println!("Existing transactions keep the category name and now count as unbudgeted.");
        }
    }

    Ok(())
}
