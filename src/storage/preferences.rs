//! Alert threshold and selected financial year

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{Amount, FinancialYear};

/// Default amount above which transactions are flagged
pub const DEFAULT_ALERT_THRESHOLD: f64 = 500.0;

/// User preferences stored alongside the budget data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub alert_threshold: Amount,
    pub financial_year: FinancialYear,
}

impl Preferences {
    pub fn new(financial_year: FinancialYear) -> Self {
        Self {
            alert_threshold: Amount::new(DEFAULT_ALERT_THRESHOLD),
            financial_year,
        }
    }
}

/// Repository for preferences
pub struct PreferenceRepository {
    data: RwLock<Preferences>,
}

impl PreferenceRepository {
    pub fn new(initial: Preferences) -> Self {
        Self {
            data: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> Result<Preferences, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(*data)
    }

    pub fn set(&self, preferences: Preferences) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = preferences;
        Ok(())
    }

    pub fn alert_threshold(&self) -> Result<Amount, BudgetError> {
        Ok(self.get()?.alert_threshold)
    }

    pub fn financial_year(&self) -> Result<FinancialYear, BudgetError> {
        Ok(self.get()?.financial_year)
    }
}
