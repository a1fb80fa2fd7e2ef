//! The persisted state snapshot
//!
//! Transactions, categories, the alert threshold and the selected financial
//! year are written together to `data/budget.json` in a single atomic write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{current_financial_year, Amount, Category, FinancialYear, Transaction};

use super::init::default_categories;
use super::preferences::{Preferences, DEFAULT_ALERT_THRESHOLD};

/// Current snapshot schema version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_threshold() -> Amount {
    Amount::new(DEFAULT_ALERT_THRESHOLD)
}

/// Everything the tracker persists, in one document
///
/// Missing fields fall back to first-run defaults. The financial year has no
/// static default because it depends on the current date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    #[serde(default = "default_threshold")]
    pub alert_threshold: Amount,

    #[serde(default)]
    pub financial_year: Option<FinancialYear>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            transactions: Vec::new(),
            categories: default_categories(),
            alert_threshold: default_threshold(),
            financial_year: None,
        }
    }
}

impl Snapshot {
    /// First-run state for the given date
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            financial_year: Some(current_financial_year(today)),
            ..Self::default()
        }
    }

    /// Preferences stored in this snapshot, resolving a missing year from `today`
    pub fn preferences(&self, today: NaiveDate) -> Preferences {
        Preferences {
            alert_threshold: self.alert_threshold,
            financial_year: self
                .financial_year
                .unwrap_or_else(|| current_financial_year(today)),
        }
    }
}
