//! Service layer for the budget tracker
//!
//! Services add validation, persistence and audit logging on top of the
//! storage layer. The aggregation functions are pure and work on plain slices.

pub mod aggregation;
pub mod category;
pub mod import;
pub mod preferences;
pub mod transaction;

pub use aggregation::{CategoryBudget, MonthlyTotals, UnbudgetedBucket};
pub use category::{CategoryService, CategoryUpdate};
pub use import::{ImportService, IMPORT_HEADERS};
pub use preferences::PreferenceService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};
