//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod category;
pub mod export;
pub mod import;
pub mod preferences;
pub mod report;
pub mod transaction;
pub mod user;

pub use audit::handle_audit_command;
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, handle_template_command};
pub use preferences::{handle_fy_command, handle_threshold_command, handle_years_command};
pub use report::{handle_report_command, handle_summary_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, FinancialYear, TransactionType};
use crate::storage::Storage;

/// Transaction type as typed on the command line (case-insensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum TypeArg {
    Income,
    Expense,
}

impl From<TypeArg> for TransactionType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Income => TransactionType::Income,
            TypeArg::Expense => TransactionType::Expense,
        }
    }
}

/// Parse an amount argument, rejecting negative values
pub(crate) fn parse_amount(input: &str) -> BudgetResult<Amount> {
    let amount = Amount::parse(input).map_err(|e| BudgetError::Validation(e.to_string()))?;
    if amount.is_negative() {
        return Err(BudgetError::Validation(format!(
            "Amount cannot be negative: {}",
            input
        )));
    }
    Ok(amount)
}

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date(input: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        BudgetError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", input))
    })
}

/// The financial year named on the command line, or the selected one
pub(crate) fn resolve_financial_year(
    storage: &Storage,
    label: Option<&str>,
) -> BudgetResult<FinancialYear> {
    match label {
        Some(label) => {
            FinancialYear::parse(label).map_err(|e| BudgetError::Validation(e.to_string()))
        }
        None => storage.preferences.financial_year(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,250.50").unwrap().value(), 1250.5);
        assert!(parse_amount("-5").unwrap_err().is_validation());
        assert!(parse_amount("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-08-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
        );
        assert!(parse_date("15/08/2024").is_err());
    }

    #[test]
    fn test_type_arg_is_case_insensitive() {
        let parsed = TypeArg::from_str("EXPENSE", true).unwrap();
        assert_eq!(TransactionType::from(parsed), TransactionType::Expense);
    }
}
