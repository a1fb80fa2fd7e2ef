//! Detailed Report
//!
//! Filtered transaction listing for one financial year with a month by
//! category pivot and a per-category summary of budget, variance and
//! utilization. The CSV export is laid out as a title block, the transaction
//! rows, then the summary section.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use chrono::{Datelike, NaiveDate};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, FinancialYear, Transaction, TransactionType};
use crate::services::aggregation::{self, CategoryBudget};
use crate::storage::Storage;

/// Filters applied to the financial year's transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    /// Calendar month as `YYYY-MM`
    pub month: Option<String>,
    pub category: Option<String>,
    pub transaction_type: Option<TransactionType>,
}

impl ReportFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.month
            .as_deref()
            .map_or(true, |m| aggregation::month_key(txn.date) == m)
            && self.category.as_deref().map_or(true, |c| txn.category == c)
            && self.transaction_type.map_or(true, |t| txn.transaction_type == t)
    }

    /// Suffix for the report title, e.g. " - August 2024 - Category: Food"
    fn describe(&self) -> String {
        let mut title = String::new();
        if let Some(month) = &self.month {
            let label = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|_| month.clone());
            title.push_str(&format!(" - {}", label));
        }
        if let Some(category) = &self.category {
            title.push_str(&format!(" - Category: {}", category));
        }
        if let Some(kind) = self.transaction_type {
            title.push_str(&format!(" - Type: {}", kind));
        }
        title
    }
}

/// A transaction row with its category's budget and variance
#[derive(Debug, Clone)]
pub struct DetailedRow {
    pub transaction: Transaction,
    pub budget: Amount,
    pub variance: Amount,
}

/// Per-category totals within one month
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PivotCell {
    pub income: Amount,
    pub expenses: Amount,
}

impl PivotCell {
    pub fn total(&self) -> Amount {
        self.income + self.expenses
    }
}

/// One month of the pivot table
#[derive(Debug, Clone)]
pub struct PivotMonth {
    pub key: String,
    pub label: String,
    pub categories: BTreeMap<String, PivotCell>,
    pub total_income: Amount,
    pub total_expenses: Amount,
}

/// Summary line for one category over the filtered transactions
#[derive(Debug, Clone)]
pub struct CategorySummaryRow {
    pub category: String,
    /// Type of the first matching transaction
    pub transaction_type: TransactionType,
    pub income: Amount,
    pub expenses: Amount,
    pub count: usize,
    /// Zero for categories that are not defined
    pub budget: Amount,
    pub variance: Amount,
    pub percentage: f64,
}

impl CategorySummaryRow {
    pub fn total(&self) -> Amount {
        self.income + self.expenses
    }
}

/// Detailed report for a financial year
#[derive(Debug, Clone)]
pub struct DetailedReport {
    pub financial_year: FinancialYear,
    pub filter: ReportFilter,
    pub generated_on: NaiveDate,
    /// Filtered transactions, newest first
    pub rows: Vec<DetailedRow>,
    /// Months with activity, newest first
    pub pivot: Vec<PivotMonth>,
    /// Categories with activity, largest total first
    pub categories: Vec<CategorySummaryRow>,
}

impl DetailedReport {
    /// Generate a detailed report
    pub fn generate(
        storage: &Storage,
        fy: FinancialYear,
        filter: ReportFilter,
        generated_on: NaiveDate,
    ) -> BudgetResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let categories = storage.categories.get_all()?;

        let breakdown: HashMap<String, CategoryBudget> =
            aggregation::category_breakdown(&categories, &transactions, fy)
                .into_iter()
                .map(|row| (row.name.clone(), row))
                .collect();

        let mut filtered: Vec<Transaction> = aggregation::transactions_in_fy(&transactions, fy)
            .into_iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.date.cmp(&a.date));

        let rows = filtered
            .iter()
            .map(|txn| {
                let (budget, variance) = transaction_variance(txn, breakdown.get(&txn.category));
                DetailedRow {
                    transaction: txn.clone(),
                    budget,
                    variance,
                }
            })
            .collect();

        Ok(Self {
            financial_year: fy,
            pivot: build_pivot(&filtered),
            categories: summarize_categories(&filtered, &breakdown),
            filter,
            generated_on,
            rows,
        })
    }

    /// Report title including any active filters
    pub fn title(&self) -> String {
        format!(
            "Budget Report - FY {}{}",
            self.financial_year,
            self.filter.describe()
        )
    }

    pub fn total_income(&self) -> Amount {
        self.categories.iter().map(|c| c.income).sum()
    }

    pub fn total_expenses(&self) -> Amount {
        self.categories.iter().map(|c| c.expenses).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", self.title()));
        output.push_str(&format!("Generated on: {}\n", self.generated_on));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No transactions match the selected filters.\n");
            return output;
        }

        output.push_str(&format!(
            "Transactions: {}   Income: {}   Expenses: {}\n",
            self.rows.len(),
            self.total_income().format_with_symbol(currency),
            self.total_expenses().format_with_symbol(currency)
        ));

        for month in &self.pivot {
            output.push_str(&format!("\n{}\n", month.label.to_uppercase()));
            for (name, cell) in &month.categories {
                output.push_str(&format!(
                    "  {:<28} {:>12} {:>12}\n",
                    name,
                    cell.income.format_with_symbol(currency),
                    cell.expenses.format_with_symbol(currency)
                ));
            }
            output.push_str(&format!(
                "  {:<28} {:>12} {:>12}\n",
                "Month Total:",
                month.total_income.format_with_symbol(currency),
                month.total_expenses.format_with_symbol(currency)
            ));
        }

        output.push_str("\nCATEGORY SUMMARY\n");
        output.push_str(&format!(
            "  {:<22} {:<8} {:>12} {:>12} {:>12} {:>8}\n",
            "Category", "Type", "Total", "Budget", "Variance", "Used"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for row in &self.categories {
            output.push_str(&format!(
                "  {:<22} {:<8} {:>12} {:>12} {:>12} {:>7.1}%\n",
                row.category,
                row.transaction_type.as_str(),
                row.total().format_with_symbol(currency),
                row.budget.format_with_symbol(currency),
                row.variance.format_with_symbol(currency),
                row.percentage
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        let export_err = |e: csv::Error| BudgetError::Export(e.to_string());

        wtr.write_record([self.title()]).map_err(export_err)?;
        wtr.write_record([format!("Generated on: {}", self.generated_on)])
            .map_err(export_err)?;
        wtr.write_record([""]).map_err(export_err)?;
        wtr.write_record([
            "Date",
            "Description",
            "Amount",
            "Category",
            "Type",
            "Budget",
            "Variance",
        ])
        .map_err(export_err)?;

        for row in &self.rows {
            let txn = &row.transaction;
            wtr.write_record([
                txn.date.format("%Y-%m-%d").to_string(),
                txn.description.clone(),
                format!("{:.2}", txn.amount.value()),
                txn.category.clone(),
                txn.transaction_type.to_string(),
                format!("{:.2}", row.budget.value()),
                format!("{:.2}", row.variance.value()),
            ])
            .map_err(export_err)?;
        }

        wtr.write_record([""]).map_err(export_err)?;
        wtr.write_record(["Summary"]).map_err(export_err)?;
        wtr.write_record([
            "Category",
            "Type",
            "Income",
            "Expenses",
            "Budget",
            "Variance",
            "Utilization %",
        ])
        .map_err(export_err)?;

        for row in &self.categories {
            wtr.write_record([
                row.category.clone(),
                row.transaction_type.to_string(),
                format!("{:.2}", row.income.value()),
                format!("{:.2}", row.expenses.value()),
                format!("{:.2}", row.budget.value()),
                format!("{:.2}", row.variance.value()),
                format!("{:.1}%", row.percentage),
            ])
            .map_err(export_err)?;
        }

        wtr.flush()
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        Ok(())
    }
}

/// Budget and variance shown next to a single transaction
///
/// Both come from the category's full-year figures. Expense variance is only
/// reported when the category has a budget.
fn transaction_variance(txn: &Transaction, category: Option<&CategoryBudget>) -> (Amount, Amount) {
    let Some(category) = category else {
        return (Amount::zero(), Amount::zero());
    };
    let variance = match txn.transaction_type {
        TransactionType::Expense if category.budget.value() > 0.0 => {
            category.budget - category.actual
        }
        TransactionType::Expense => Amount::zero(),
        TransactionType::Income => category.actual - category.budget,
    };
    (category.budget, variance)
}

fn build_pivot(transactions: &[Transaction]) -> Vec<PivotMonth> {
    let mut months: BTreeMap<String, PivotMonth> = BTreeMap::new();

    for txn in transactions {
        let key = aggregation::month_key(txn.date);
        let month = months.entry(key.clone()).or_insert_with(|| PivotMonth {
            label: txn.date.with_day(1).unwrap_or(txn.date).format("%B %Y").to_string(),
            key,
            categories: BTreeMap::new(),
            total_income: Amount::zero(),
            total_expenses: Amount::zero(),
        });

        let cell = month.categories.entry(txn.category.clone()).or_default();
        match txn.transaction_type {
            TransactionType::Income => {
                cell.income += txn.amount;
                month.total_income += txn.amount;
            }
            TransactionType::Expense => {
                cell.expenses += txn.amount;
                month.total_expenses += txn.amount;
            }
        }
    }

    months.into_values().rev().collect()
}

fn summarize_categories(
    transactions: &[Transaction],
    breakdown: &HashMap<String, CategoryBudget>,
) -> Vec<CategorySummaryRow> {
    let mut order: Vec<String> = Vec::new();
    let mut rows: HashMap<String, CategorySummaryRow> = HashMap::new();

    for txn in transactions {
        let row = rows.entry(txn.category.clone()).or_insert_with(|| {
            order.push(txn.category.clone());
            CategorySummaryRow {
                category: txn.category.clone(),
                transaction_type: txn.transaction_type,
                income: Amount::zero(),
                expenses: Amount::zero(),
                count: 0,
                budget: breakdown
                    .get(&txn.category)
                    .map(|c| c.budget)
                    .unwrap_or_default(),
                variance: Amount::zero(),
                percentage: 0.0,
            }
        });

        match txn.transaction_type {
            TransactionType::Income => row.income += txn.amount,
            TransactionType::Expense => row.expenses += txn.amount,
        }
        row.count += 1;
    }

    let mut summary: Vec<CategorySummaryRow> = order
        .into_iter()
        .filter_map(|name| rows.remove(&name))
        .map(|mut row| {
            let actual = match row.transaction_type {
                TransactionType::Expense => row.expenses,
                TransactionType::Income => row.income,
            };
            row.variance = match row.transaction_type {
                TransactionType::Expense => row.budget - actual,
                TransactionType::Income => actual - row.budget,
            };
            row.percentage = if row.budget.value() > 0.0 {
                actual.value() / row.budget.value() * 100.0
            } else {
                0.0
            };
            row
        })
        .collect();

    summary.sort_by(|a, b| b.total().value().total_cmp(&a.total().value()));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::Category;
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
            .categories
            .replace_all(vec![
                Category::income("Salary", 5000.0),
                Category::expense("Food", 600.0),
            ])
            .unwrap();

        let txn = |m: u32, d: u32, desc: &str, category: &str, amount: f64, kind| {
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
                desc,
                Amount::new(amount),
                category,
                kind,
            )
        };
        storage
            .transactions
            .append_all(vec![
                txn(8, 1, "Pay", "Salary", 4500.0, TransactionType::Income),
                txn(8, 15, "Groceries, weekly", "Food", 400.0, TransactionType::Expense),
                txn(9, 3, "Market", "Food", 300.0, TransactionType::Expense),
                txn(9, 9, "Flight", "Travel", 250.0, TransactionType::Expense),
            ])
            .unwrap();
    }

    fn generated_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
    }

    #[test]
    fn test_generate_report() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let report = DetailedReport::generate(
            &storage,
            FinancialYear::new(2024),
            ReportFilter::default(),
            generated_on(),
        )
        .unwrap();

        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.rows[0].transaction.description, "Flight");

        let food_row = report
            .rows
            .iter()
            .find(|r| r.transaction.category == "Food")
            .unwrap();
        assert_eq!(food_row.budget.value(), 600.0);
        assert_eq!(food_row.variance.value(), -100.0);

        let travel_row = &report.rows[0];
        assert!(travel_row.budget.is_zero());
        assert!(travel_row.variance.is_zero());

        assert_eq!(report.pivot.len(), 2);
        assert_eq!(report.pivot[0].key, "2024-09");
        assert_eq!(report.pivot[0].label, "September 2024");
        assert_eq!(report.pivot[1].categories["Salary"].income.value(), 4500.0);

        assert_eq!(report.categories[0].category, "Salary");
        let food = report.categories.iter().find(|c| c.category == "Food").unwrap();
        assert_eq!(food.count, 2);
        assert_eq!(food.variance.value(), -100.0);
        assert!((food.percentage - 116.666).abs() < 0.01);
    }

    #[test]
    fn test_filters() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let filter = ReportFilter {
            month: Some("2024-09".into()),
            category: Some("Food".into()),
            transaction_type: Some(TransactionType::Expense),
        };
        let report =
            DetailedReport::generate(&storage, FinancialYear::new(2024), filter, generated_on())
                .unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].transaction.description, "Market");
        assert_eq!(
            report.title(),
            "Budget Report - FY 2024-2025 - September 2024 - Category: Food - Type: Expense"
        );

        // Category summary covers only the filtered rows; the per-row
        // variance still uses the full-year figures.
        assert_eq!(report.categories[0].variance.value(), 300.0);
        assert_eq!(report.rows[0].variance.value(), -100.0);
    }

    #[test]
    fn test_csv_export() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let report = DetailedReport::generate(
            &storage,
            FinancialYear::new(2024),
            ReportFilter::default(),
            generated_on(),
        )
        .unwrap();

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Budget Report - FY 2024-2025");
        assert_eq!(lines[1], "Generated on: 2024-10-01");
        assert_eq!(lines[3], "Date,Description,Amount,Category,Type,Budget,Variance");
        assert!(text.contains("2024-08-15,\"Groceries, weekly\",400.00,Food,Expense,600.00,-100.00"));
        assert!(text.contains("Category,Type,Income,Expenses,Budget,Variance,Utilization %"));
        assert!(text.contains("Food,Expense,0.00,700.00,600.00,-100.00,116.7%"));
        assert!(text.contains("Travel,Expense,0.00,250.00,0.00,-250.00,0.0%"));
    }

    #[test]
    fn test_empty_report() {
        let (_temp_dir, storage) = create_test_storage();

        let report = DetailedReport::generate(
            &storage,
            FinancialYear::new(2024),
            ReportFilter::default(),
            generated_on(),
        )
        .unwrap();

        assert!(report.rows.is_empty());
        assert!(report
            .format_terminal("$")
            .contains("No transactions match the selected filters."));
    }

    #[test]
    fn test_terminal_format_uses_currency_symbol() {
        let (_temp_dir, storage) = create_test_storage();
        setup_test_data(&storage);

        let report = DetailedReport::generate(
            &storage,
            FinancialYear::new(2024),
            ReportFilter::default(),
            generated_on(),
        )
        .unwrap();
        let output = report.format_terminal("€");

        assert!(output.contains("Income: €4500.00"));
        assert!(output.contains("Expenses: €950.00"));
        assert!(!output.contains('$'));
    }
}
