//! Core data models for the budget tracker
//!
//! Transactions, categories, amounts, identifiers and the July-to-June
//! financial year everything is reported against.

pub mod amount;
pub mod category;
pub mod financial_year;
pub mod ids;
pub mod transaction;

pub use amount::{Amount, AmountParseError};
pub use category::{Category, CategoryValidationError};
pub use financial_year::{
    available_financial_years, current_financial_year, resolve_range, FinancialYear,
    FinancialYearParseError,
};
pub use ids::{CategoryId, TransactionId, UserId};
pub use transaction::{
    Transaction, TransactionType, TransactionValidationError, MAX_DESCRIPTION_CHARS,
};
