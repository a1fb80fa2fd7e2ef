//! Financial Year Summary Report
//!
//! Headline totals for one financial year plus budget versus actual for every
//! category, split into income and expense sections.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, FinancialYear, TransactionType};
use crate::services::aggregation::{self, CategoryBudget, UnbudgetedBucket};
use crate::storage::Storage;

/// Financial year summary
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub financial_year: FinancialYear,
    pub total_income: Amount,
    pub total_expenses: Amount,
    pub net_position: Amount,
    /// Expenses as a percentage of income
    pub utilization: f64,
    /// Income categories, highest actual first
    pub income_categories: Vec<CategoryBudget>,
    /// Expense categories, highest actual first
    pub expense_categories: Vec<CategoryBudget>,
    /// Transactions filed under categories that no longer exist
    pub unbudgeted: UnbudgetedBucket,
    pub alert_threshold: Amount,
    /// Transactions above the alert threshold
    pub flagged_count: usize,
}

impl SummaryReport {
    /// Generate the summary for a financial year
    pub fn generate(storage: &Storage, fy: FinancialYear) -> BudgetResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let categories = storage.categories.get_all()?;
        let alert_threshold = storage.preferences.alert_threshold()?;

        let total_income = aggregation::total_income(&transactions, fy);
        let total_expenses = aggregation::total_expenses(&transactions, fy);

        let (mut income_categories, mut expense_categories): (Vec<_>, Vec<_>) =
            aggregation::category_breakdown(&categories, &transactions, fy)
                .into_iter()
                .partition(|row| row.category_type == TransactionType::Income);

        let by_actual_desc =
            |a: &CategoryBudget, b: &CategoryBudget| b.actual.value().total_cmp(&a.actual.value());
        income_categories.sort_by(by_actual_desc);
        expense_categories.sort_by(by_actual_desc);

        let flagged_count = aggregation::transactions_in_fy(&transactions, fy)
            .into_iter()
            .filter(|t| t.exceeds_threshold(alert_threshold))
            .count();

        Ok(Self {
            financial_year: fy,
            total_income,
            total_expenses,
            net_position: total_income - total_expenses,
            utilization: aggregation::budget_utilization(&transactions, fy),
            income_categories,
            expense_categories,
            unbudgeted: aggregation::unbudgeted(&categories, &transactions, fy),
            alert_threshold,
            flagged_count,
        })
    }

    /// Number of expense categories over their budget
    pub fn over_budget_count(&self) -> usize {
        self.expense_categories
            .iter()
            .filter(|c| c.is_over_budget())
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Financial Year Summary - {}\n", self.financial_year));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!("Total Income:    {:>14}\n", self.total_income.format_with_symbol(currency)));
        output.push_str(&format!("Total Expenses:  {:>14}\n", self.total_expenses.format_with_symbol(currency)));
        output.push_str(&format!("Net Position:    {:>14}\n", self.net_position.format_with_symbol(currency)));
        output.push_str(&format!("Utilization:     {:>13.1}%\n", self.utilization));
        if self.flagged_count > 0 {
            output.push_str(&format!(
                "Flagged:         {:>14}  (over {})\n",
                self.flagged_count,
                self.alert_threshold.format_with_symbol(currency)
            ));
        }

        for (title, rows) in [
            ("INCOME", &self.income_categories),
            ("EXPENSES", &self.expense_categories),
        ] {
            output.push_str(&format!("\n{}\n", title));
            output.push_str(&format!(
                "  {:<22} {:>12} {:>12} {:>12} {:>8}\n",
                "Category", "Budget", "Actual", "Remaining", "Used"
            ));
            output.push_str(&"-".repeat(72));
            output.push('\n');

            for row in rows {
                let marker = if row.is_over_budget() { " *" } else { "" };
                output.push_str(&format!(
                    "  {:<22} {:>12} {:>12} {:>12} {:>7.1}%{}\n",
                    row.name,
                    row.budget.format_with_symbol(currency),
                    row.actual.format_with_symbol(currency),
                    row.remaining.format_with_symbol(currency),
                    row.percentage,
                    marker
                ));
            }
        }

        if !self.unbudgeted.is_empty() {
            output.push_str(&format!(
                "\nUnbudgeted: {} transaction(s), income {}, expenses {} ({})\n",
                self.unbudgeted.count,
                self.unbudgeted.income.format_with_symbol(currency),
                self.unbudgeted.expenses.format_with_symbol(currency),
                self.unbudgeted.categories.join(", ")
            ));
        }

        if self.over_budget_count() > 0 {
            output.push_str("\n* = Over budget\n");
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| BudgetError::Export(e.to_string());

        wtr.write_record([
            "Financial Year",
            "Category",
            "Type",
            "Budget",
            "Actual",
            "Remaining",
            "Percentage",
        ])
        .map_err(export_err)?;

        let fy = self.financial_year.to_string();
        for row in self.income_categories.iter().chain(&self.expense_categories) {
            wtr.write_record([
                fy.clone(),
                row.name.clone(),
                row.category_type.to_string(),
                format!("{:.2}", row.budget.value()),
                format!("{:.2}", row.actual.value()),
                format!("{:.2}", row.remaining.value()),
                format!("{:.2}", row.percentage),
            ])
            .map_err(export_err)?;
        }

        if !self.unbudgeted.is_empty() {
            wtr.write_record([
                fy.clone(),
                "(unbudgeted)".to_string(),
                String::new(),
                String::new(),
                format!(
                    "{:.2}",
                    (self.unbudgeted.income + self.unbudgeted.expenses).value()
                ),
                String::new(),
                String::new(),
            ])
            .map_err(export_err)?;
        }

        for (label, amount) in [
            ("TOTAL INCOME", self.total_income),
            ("TOTAL EXPENSES", self.total_expenses),
            ("NET POSITION", self.net_position),
        ] {
            wtr.write_record([
                fy.clone(),
                label.to_string(),
                String::new(),
                String::new(),
                format!("{:.2}", amount.value()),
                String::new(),
                String::new(),
            ])
            .map_err(export_err)?;
        }

        wtr.flush()
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        Ok(())
    }
}
