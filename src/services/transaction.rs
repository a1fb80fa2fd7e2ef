//! Transaction service
//!
//! Validated create/update/delete for transactions plus filtered listing.
//! Manual entry rejects negative amounts outright; the sign of a transaction
//! comes only from its type.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, FinancialYear, Transaction, TransactionType};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub financial_year: Option<FinancialYear>,
    pub transaction_type: Option<TransactionType>,
    /// Exact category name
    pub category: Option<String>,
    /// Calendar month number (1-12)
    pub month: Option<u32>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn financial_year(mut self, fy: FinancialYear) -> Self {
        self.financial_year = Some(fy);
        self
    }

    pub fn transaction_type(mut self, kind: TransactionType) -> Self {
        self.transaction_type = Some(kind);
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a single transaction against every set criterion
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(fy) = self.financial_year {
            if !fy.contains(txn.date) {
                return false;
            }
        }
        if let Some(kind) = self.transaction_type {
            if txn.transaction_type != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &txn.category != category {
                return false;
            }
        }
        if let Some(month) = self.month {
            if txn.date.month() != month {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !txn
                .description
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub transaction_type: TransactionType,
}

/// Changes to apply to an existing transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
    pub transaction_type: Option<TransactionType>,
}

fn audit_label(txn: &Transaction) -> String {
    format!("{} {}", txn.date, txn.description)
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> BudgetResult<Transaction> {
        let txn = Transaction::new(
            input.date,
            input.description.trim(),
            input.amount,
            input.category.trim(),
            input.transaction_type,
        );

        txn.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if self.storage.categories.get_by_name(&txn.category)?.is_none() {
            debug!("Transaction uses unknown category '{}'", txn.category);
        }

        self.storage
            .commit(|| self.storage.transactions.insert(txn.clone()))?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Find a transaction by full or short ID
    pub fn find(&self, identifier: &str) -> BudgetResult<Option<Transaction>> {
        self.storage.transactions.find(identifier)
    }

    /// List transactions matching the filter, newest first
    pub fn list(&self, filter: &TransactionFilter) -> BudgetResult<Vec<Transaction>> {
        let mut transactions = self.storage.transactions.get_all()?;
        transactions.retain(|t| filter.matches(t));
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Update a transaction in place
    pub fn update(&self, identifier: &str, update: TransactionUpdate) -> BudgetResult<Transaction> {
        let mut txn = self
            .find(identifier)?
            .ok_or_else(|| BudgetError::transaction_not_found(identifier))?;
        let before = txn.clone();

        if let Some(date) = update.date {
            txn.date = date;
        }
        if let Some(description) = update.description {
            txn.description = description.trim().to_string();
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(category) = update.category {
            txn.category = category.trim().to_string();
        }
        if let Some(kind) = update.transaction_type {
            txn.transaction_type = kind;
        }

        txn.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if txn == before {
            return Ok(txn);
        }
        txn.touch();

        self.storage
            .commit(|| self.storage.transactions.update(txn.clone()))?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, identifier: &str) -> BudgetResult<Transaction> {
        let txn = self
            .find(identifier)?
            .ok_or_else(|| BudgetError::transaction_not_found(identifier))?;

        self.storage.commit(|| self.storage.transactions.delete(txn.id))?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Transactions above the alert threshold within the financial year
    pub fn flagged(&self, fy: FinancialYear) -> BudgetResult<Vec<Transaction>> {
        let threshold = self.storage.preferences.alert_threshold()?;
        let mut transactions = self.list(&TransactionFilter::new().financial_year(fy))?;
        transactions.retain(|t| t.exceeds_threshold(threshold));
        Ok(transactions)
    }

    pub fn count(&self) -> BudgetResult<usize> {
        self.storage.transactions.count()
    }
}
