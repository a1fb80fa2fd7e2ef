//! Display formatting for terminal output
//!
//! Tables and detail views for categories and transactions, plus small
//! helpers the reports share.

pub mod category;
pub mod report;
pub mod transaction;

pub use category::{format_category_budgets, format_category_details, format_category_list};
pub use transaction::{format_transaction_details, format_transaction_list};
