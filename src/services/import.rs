//! CSV Import service
//!
//! Bulk import of transactions from CSV files with a `Date, Description,
//! Amount, Category, Type` header. Header names are matched case-insensitively
//! in any order. Imports are all-or-nothing: the first bad row rejects the
//! whole file and nothing is appended.

use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, info};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, Transaction, TransactionType};
use crate::storage::Storage;

/// Header columns, in the order exports and the template write them
pub const IMPORT_HEADERS: [&str; 5] = ["Date", "Description", "Amount", "Category", "Type"];

/// Fallback date formats tried after the preferred one
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
];

/// Positions of the import columns within a file's header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub category: usize,
    pub kind: usize,
}

impl ColumnMapping {
    /// Locate every required column in a header record
    pub fn from_headers(headers: &StringRecord) -> Result<Self, String> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let mut missing = Vec::new();
        let mut find = |name: &'static str| {
            let found = position(name);
            if found.is_none() {
                missing.push(name);
            }
            found.unwrap_or_default()
        };

        let mapping = Self {
            date: find("Date"),
            description: find("Description"),
            amount: find("Amount"),
            category: find("Category"),
            kind: find("Type"),
        };

        if missing.is_empty() {
            Ok(mapping)
        } else {
            Err(format!("Missing required columns: {}", missing.join(", ")))
        }
    }
}

/// A row that parsed cleanly, before it becomes a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub transaction_type: TransactionType,
}

impl ParsedRow {
    pub fn into_transaction(self) -> Transaction {
        Transaction::new(
            self.date,
            self.description,
            self.amount,
            self.category,
            self.transaction_type,
        )
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    date_format: String,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            date_format: DATE_FORMATS[0].to_string(),
        }
    }

    /// Try this date format before the built-in ones
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Parse every data row of a CSV, stopping at the first failure
    ///
    /// Row numbers in error messages are 1-based and count data rows only.
    pub fn parse_csv<R: Read>(&self, input: R) -> BudgetResult<Vec<ParsedRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| BudgetError::Import(format!("Could not read header row: {}", e)))?
            .clone();
        let mapping = ColumnMapping::from_headers(&headers).map_err(BudgetError::Import)?;

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 1;
            let record = result
                .map_err(|e| BudgetError::Import(format!("Row {}: {}", row_number, e)))?;

            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let row = self
                .parse_record(&record, &mapping)
                .map_err(|e| BudgetError::Import(format!("Row {}: {}", row_number, e)))?;
            rows.push(row);
        }

        debug!(rows = rows.len(), "Parsed import file");
        Ok(rows)
    }

    /// Parse a single CSV record
    fn parse_record(&self, record: &StringRecord, mapping: &ColumnMapping) -> Result<ParsedRow, String> {
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .ok_or_else(|| format!("Missing {} value", name))
        };

        let date = self.parse_date(field(mapping.date, "date")?)?;

        let amount_str = field(mapping.amount, "amount")?;
        let amount = Amount::parse_magnitude(amount_str).map_err(|e| e.to_string())?;

        let category = field(mapping.category, "category")?;
        if category.is_empty() {
            return Err("Category is required".to_string());
        }

        let transaction_type: TransactionType = field(mapping.kind, "type")?.parse()?;

        let description = record
            .get(mapping.description)
            .unwrap_or_default()
            .to_string();

        let row = ParsedRow {
            date,
            description,
            amount,
            category: category.to_string(),
            transaction_type,
        };
        row.clone()
            .into_transaction()
            .validate()
            .map_err(|e| e.to_string())?;

        Ok(row)
    }

    /// Parse a date string using multiple format attempts
    fn parse_date(&self, s: &str) -> Result<NaiveDate, String> {
        if let Ok(date) = NaiveDate::parse_from_str(s, &self.date_format) {
            return Ok(date);
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date);
            }
        }

        Err(format!("Could not parse date: '{}'", s))
    }

    /// Import from any reader, returning the number of appended transactions
    pub fn import_reader<R: Read>(&self, input: R, source: &str) -> BudgetResult<usize> {
        let rows = self.parse_csv(input)?;
        if rows.is_empty() {
            info!(source, "Import file has no data rows");
            return Ok(0);
        }

        let batch: Vec<Transaction> = rows.into_iter().map(ParsedRow::into_transaction).collect();
        let count = batch.len();

        self.storage
            .commit(|| self.storage.transactions.append_all(batch))?;
        self.storage.log_import(source, count)?;

        Ok(count)
    }

    /// Import a CSV file from disk
    pub fn import_file(&self, path: &Path) -> BudgetResult<usize> {
        let file = std::fs::File::open(path).map_err(|e| {
            BudgetError::Import(format!("Could not open {}: {}", path.display(), e))
        })?;
        self.import_reader(file, &path.display().to_string())
    }

    /// Write a fill-in template: header, two sample rows, and the known
    /// category names as `#` comment lines the importer skips
    pub fn write_template<W: Write>(&self, mut out: W, today: NaiveDate) -> BudgetResult<()> {
        let categories = self.storage.categories.get_all()?;
        let names_of = |kind: TransactionType| {
            categories
                .iter()
                .filter(|c| c.category_type == kind)
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let income = names_of(TransactionType::Income);
        let expense = names_of(TransactionType::Expense);

        let io_err = |e: std::io::Error| BudgetError::Export(e.to_string());
        let csv_err = |e: csv::Error| BudgetError::Export(e.to_string());

        writeln!(out, "# Budget Tracker import template").map_err(io_err)?;
        writeln!(out, "# Dates should be YYYY-MM-DD; Type must be Income or Expense")
            .map_err(io_err)?;
        writeln!(out, "# Income categories: {}", income).map_err(io_err)?;
        writeln!(out, "# Expense categories: {}", expense).map_err(io_err)?;

        let today = today.format("%Y-%m-%d").to_string();
        let mut writer = WriterBuilder::new().from_writer(out);
        writer.write_record(IMPORT_HEADERS).map_err(csv_err)?;
        writer
            .write_record([today.as_str(), "Example Transaction", "100.00", "Food", "Expense"])
            .map_err(csv_err)?;
        writer
            .write_record([today.as_str(), "Example Income", "1000.00", "Salary", "Income"])
            .map_err(csv_err)?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }
}
