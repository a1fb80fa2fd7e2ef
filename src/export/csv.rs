//! CSV Export functionality
//!
//! Exports transactions with the same columns the importer reads, so an
//! exported file can be imported again unchanged.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::FinancialYear;
use crate::services::IMPORT_HEADERS;
use crate::storage::Storage;

/// Export transactions to CSV, oldest first
///
/// With a financial year only that year's transactions are written.
/// Returns the number of rows written.
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    writer: &mut W,
    fy: Option<FinancialYear>,
) -> BudgetResult<usize> {
    let mut transactions = storage.transactions.get_all()?;
    if let Some(fy) = fy {
        transactions.retain(|t| fy.contains(t.date));
    }
    transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    let export_err = |e: ::csv::Error| BudgetError::Export(e.to_string());
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record(IMPORT_HEADERS).map_err(export_err)?;
    for txn in &transactions {
        wtr.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            txn.description.clone(),
            format!("{:.2}", txn.amount.value()),
            txn.category.clone(),
            txn.transaction_type.to_string(),
        ])
        .map_err(export_err)?;
    }

    wtr.flush().map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{Amount, Transaction, TransactionType};
    use crate::services::ImportService;
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

    fn setup_test_data(storage: &Storage) {
        storage
            .transactions
            .append_all(vec![
                Transaction::new(
                    NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
                    "Groceries, \"bulk\"",
                    Amount::new(700.0),
                    "Food",
                    TransactionType::Expense,
                ),
                Transaction::new(
                    NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
                    "Pay",
                    Amount::new(4500.0),
                    "Salary",
                    TransactionType::Income,
                ),
                Transaction::new(
                    NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
                    "Old",
                    Amount::new(10.0),
                    "Food",
                    TransactionType::Expense,
                ),
            ])
            .unwrap();
    }

    #[test]
    fn test_export_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let mut out = Vec::new();
        let count = export_transactions_csv(&storage, &mut out, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(count, 3);
        assert_eq!(lines[0], "Date,Description,Amount,Category,Type");
        assert_eq!(lines[1], "2023-12-01,Old,10.00,Food,Expense");
        assert_eq!(lines[2], "2024-08-01,Pay,4500.00,Salary,Income");
        assert_eq!(
            lines[3],
            "2024-08-15,\"Groceries, \"\"bulk\"\"\",700.00,Food,Expense"
        );
    }

    #[test]
    fn test_export_filters_by_year() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let mut out = Vec::new();
        let count =
            export_transactions_csv(&storage, &mut out, Some(FinancialYear::new(2024))).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_export_reimports() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let mut out = Vec::new();
        export_transactions_csv(&storage, &mut out, None).unwrap();

        let (_other_dir, other) = create_test_storage();
        let count = ImportService::new(&other)
            .import_reader(out.as_slice(), "export.csv")
            .unwrap();
        assert_eq!(count, 3);

        let descriptions: Vec<String> = other
            .transactions
            .get_all()
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert!(descriptions.contains(&"Groceries, \"bulk\"".to_string()));
    }

    #[test]
    fn test_awkward_text_survives_reimport() {
        let (_temp_dir, storage) = create_test_storage();
        let awkward = [
            "Cash\rback",
            "Line one\nline two",
            "Say \"hi\", then leave",
            "Plain",
        ];
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        storage
            .transactions
            .append_all(
                awkward
                    .iter()
                    .map(|d| {
                        let kind = TransactionType::Expense;
                        Transaction::new(date, *d, Amount::new(5.0), "Food, misc", kind)
                    })
                    .collect(),
            )
            .unwrap();

        let mut out = Vec::new();
        export_transactions_csv(&storage, &mut out, None).unwrap();

        let (_other_dir, other) = create_test_storage();
        let count = ImportService::new(&other)
            .import_reader(out.as_slice(), "export.csv")
            .unwrap();
        assert_eq!(count, awkward.len());

        let imported = other.transactions.get_all().unwrap();
        for (txn, expected) in imported.iter().zip(awkward) {
            assert_eq!(txn.description, expected);
            assert_eq!(txn.category, "Food, misc");
        }
    }
}
