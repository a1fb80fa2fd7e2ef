//! JSON Export functionality
//!
//! Exports the complete budget state to JSON with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, Category, FinancialYear, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full state export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub financial_year: FinancialYear,

    pub alert_threshold: Amount,

    pub categories: Vec<Category>,

    pub transactions: Vec<Transaction>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,

    pub category_count: usize,

    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,

    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> BudgetResult<Self> {
        let snapshot = storage.snapshot()?;
        let transactions = snapshot.transactions;
        let categories = snapshot.categories;

        let earliest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.to_string());

        let latest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            category_count: categories.len(),
            earliest_transaction,
            latest_transaction,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            financial_year: storage.preferences.financial_year()?,
            alert_threshold: snapshot.alert_threshold,
            categories,
            transactions,
            metadata,
        })
    }
}

/// Export the full state to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::TransactionType;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage
            .load_all_as_of(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap())
            .unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .transactions
            .insert(Transaction::new(
                NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
                "Groceries",
                Amount::new(700.0),
                "Food",
                TransactionType::Expense,
            ))
            .unwrap();

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.financial_year.to_string(), "2024-2025");
        assert_eq!(export.metadata.category_count, 12);
        assert_eq!(export.metadata.transaction_count, 1);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2024-08-15"));
    }

    #[test]
    fn test_json_output() {
        let (_temp_dir, storage) = create_test_storage();

        let mut out = Vec::new();
        export_full_json(&storage, &mut out, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.categories.len(), 12);
        assert_eq!(parsed.alert_threshold.value(), 500.0);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"financial_year\": \"2024-2025\""));
    }
}
