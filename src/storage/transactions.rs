//! Transaction repository
//!
//! Holds the ordered transaction collection in memory. Every mutation builds
//! a complete new collection and swaps it in; persistence is done by
//! [`Storage::save_all`](super::Storage::save_all) as part of the snapshot.

use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Transaction, TransactionId};

/// Repository for transactions, kept in insertion order
#[derive(Default)]
pub struct TransactionRepository {
    data: RwLock<Vec<Transaction>>,
}

impl TransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (used when loading a snapshot)
    pub fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), BudgetError> {
        self.swap(|_| transactions)
    }

    /// Get all transactions in insertion order
    pub fn get_all(&self) -> Result<Vec<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|t| t.id == id).cloned())
    }

    /// Find a transaction by full UUID or short display ID
    pub fn find(&self, input: &str) -> Result<Option<Transaction>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|t| t.id.matches(input)).cloned())
    }

    /// Append one transaction
    pub fn insert(&self, txn: Transaction) -> Result<(), BudgetError> {
        self.append_all(vec![txn])
    }

    /// Append a batch of transactions in one replacement
    pub fn append_all(&self, batch: Vec<Transaction>) -> Result<(), BudgetError> {
        self.swap(|current| {
            let mut next = Vec::with_capacity(current.len() + batch.len());
            next.extend_from_slice(current);
            next.extend(batch);
            next
        })
    }

    /// Replace the transaction with the same ID in place
    ///
    /// Returns false if no transaction has that ID.
    pub fn update(&self, txn: Transaction) -> Result<bool, BudgetError> {
        let mut found = false;
        self.swap(|current| {
            current
                .iter()
                .map(|t| {
                    if t.id == txn.id {
                        found = true;
                        txn.clone()
                    } else {
                        t.clone()
                    }
                })
                .collect()
        })?;
        Ok(found)
    }

    /// Remove a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, BudgetError> {
        let mut removed = None;
        self.swap(|current| {
            current
                .iter()
                .filter(|t| {
                    if t.id == id {
                        removed = Some((*t).clone());
                        false
                    } else {
                        true
                    }
                })
                .cloned()
                .collect()
        })?;
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    fn swap<F>(&self, build: F) -> Result<(), BudgetError>
    where
        F: FnOnce(&[Transaction]) -> Vec<Transaction>,
    {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let next = build(&data);
        *data = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, TransactionType};
    use chrono::NaiveDate;

    fn txn(day: u32, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            "Groceries",
            Amount::new(amount),
            "Food",
            TransactionType::Expense,
        )
    }

    #[test]
    fn test_empty_repo() {
        let repo = TransactionRepository::new();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let repo = TransactionRepository::new();
        let t = txn(15, 50.0);
        let id = t.id;

        repo.insert(t).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount.value(), 50.0);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let repo = TransactionRepository::new();
        repo.insert(txn(20, 1.0)).unwrap();
        repo.insert(txn(10, 2.0)).unwrap();
        repo.append_all(vec![txn(5, 3.0), txn(25, 4.0)]).unwrap();

        let amounts: Vec<f64> = repo
            .get_all()
            .unwrap()
            .iter()
            .map(|t| t.amount.value())
            .collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_find_by_short_id() {
        let repo = TransactionRepository::new();
        let t = txn(15, 50.0);
        let short = t.id.to_string();
        repo.insert(t.clone()).unwrap();

        assert_eq!(repo.find(&short).unwrap().map(|f| f.id), Some(t.id));
        assert!(repo.find("txn-zzzzzzzz").unwrap().is_none());
    }

    #[test]
    fn test_update_in_place() {
        let repo = TransactionRepository::new();
        let first = txn(1, 10.0);
        let mut second = txn(2, 20.0);
        repo.insert(first.clone()).unwrap();
        repo.insert(second.clone()).unwrap();

        second.amount = Amount::new(25.0);
        assert!(repo.update(second.clone()).unwrap());

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].amount.value(), 25.0);

        assert!(!repo.update(txn(3, 1.0)).unwrap());
    }

    #[test]
    fn test_delete() {
        let repo = TransactionRepository::new();
        let t = txn(15, 50.0);
        let id = t.id;
        repo.insert(t).unwrap();

        let removed = repo.delete(id).unwrap();
        assert_eq!(removed.map(|r| r.id), Some(id));
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.delete(id).unwrap().is_none());
    }
}
