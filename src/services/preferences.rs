//! Preference service
//!
//! Changes to the alert threshold and the selected financial year. Both are
//! persisted with the rest of the snapshot and recorded in the audit log.

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, FinancialYear};
use crate::storage::{Preferences, Storage};

/// Audit log entity id for the preference record
const PREFERENCES_ID: &str = "preferences";

/// Service for preference management
pub struct PreferenceService<'a> {
    storage: &'a Storage,
}

impl<'a> PreferenceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> BudgetResult<Preferences> {
        self.storage.preferences.get()
    }

    /// Set the amount above which transactions are flagged
    pub fn set_alert_threshold(&self, threshold: Amount) -> BudgetResult<Preferences> {
        if threshold.is_negative() {
            return Err(BudgetError::Validation(
                "Alert threshold cannot be negative".into(),
            ));
        }

        self.apply(|prefs| prefs.alert_threshold = threshold)
    }

    /// Select the financial year views default to
    pub fn set_financial_year(&self, fy: FinancialYear) -> BudgetResult<Preferences> {
        self.apply(|prefs| prefs.financial_year = fy)
    }

    /// Parse a "YYYY-YYYY" label and select it
    pub fn select_financial_year(&self, label: &str) -> BudgetResult<Preferences> {
        let fy = FinancialYear::parse(label).map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.set_financial_year(fy)
    }

    fn apply(&self, change: impl FnOnce(&mut Preferences)) -> BudgetResult<Preferences> {
        let before = self.storage.preferences.get()?;
        let mut after = before;
        change(&mut after);

        if after == before {
            return Ok(after);
        }

        self.storage.commit(|| self.storage.preferences.set(after))?;
        self.storage.log_update(
            EntityType::Preference,
            PREFERENCES_ID,
            None,
            &before,
            &after,
        )?;

        Ok(after)
    }
}
