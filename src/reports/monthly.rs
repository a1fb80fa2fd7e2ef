//! Monthly Report
//!
//! Income, expenses and net for each of the twelve months of a financial
//! year, July first. Months without activity appear with zero totals.

use std::io::Write;

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, FinancialYear};
use crate::services::aggregation::{self, MonthlyTotals};
use crate::storage::Storage;

/// One month of the financial year
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRow {
    /// `YYYY-MM`
    pub key: String,
    /// e.g. "July 2024"
    pub label: String,
    pub income: Amount,
    pub expenses: Amount,
}

impl MonthRow {
    pub fn net(&self) -> Amount {
        self.income - self.expenses
    }

    pub fn is_deficit(&self) -> bool {
        self.net().is_negative()
    }
}

/// Monthly income/expense report
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub financial_year: FinancialYear,
    pub months: Vec<MonthRow>,
    pub total_income: Amount,
    pub total_expenses: Amount,
}

impl MonthlyReport {
    /// Generate the monthly report for a financial year
    pub fn generate(storage: &Storage, fy: FinancialYear) -> BudgetResult<Self> {
        let transactions = storage.transactions.get_all()?;
        let series = aggregation::monthly_series(&transactions, fy);

        let months: Vec<MonthRow> = fy
            .months()
            .into_iter()
            .map(|(year, month)| {
                let key = format!("{:04}-{:02}", year, month);
                let totals: MonthlyTotals = series.get(&key).copied().unwrap_or_default();
                let label = NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|d| d.format("%B %Y").to_string())
                    .unwrap_or_else(|| key.clone());
                MonthRow {
                    key,
                    label,
                    income: totals.income,
                    expenses: totals.expenses,
                }
            })
            .collect();

        let total_income = months.iter().map(|m| m.income).sum();
        let total_expenses = months.iter().map(|m| m.expenses).sum();

        Ok(Self {
            financial_year: fy,
            months,
            total_income,
            total_expenses,
        })
    }

    pub fn net(&self) -> Amount {
        self.total_income - self.total_expenses
    }

    /// Largest monthly income or expense, used to scale the bars
    fn max_value(&self) -> f64 {
        self.months
            .iter()
            .map(|m| m.income.value().max(m.expenses.value()))
            .fold(0.0, f64::max)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        let max = self.max_value();

        output.push_str(&format!("Monthly Report - {}\n", self.financial_year));
        output.push_str(&"=".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>12} {:>12} {:>12}  {}\n",
            "Month", "Income", "Expenses", "Net", "Spending"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for month in &self.months {
            let status = if month.is_deficit() { " deficit" } else { "" };
            output.push_str(&format!(
                "{:<16} {:>12} {:>12} {:>12}  {}{}\n",
                month.label,
                month.income.format_with_symbol(currency),
                month.expenses.format_with_symbol(currency),
                month.net().format_with_symbol(currency),
                crate::display::report::format_bar(month.expenses.value(), max, 16),
                status
            ));
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_income.format_with_symbol(currency),
            self.total_expenses.format_with_symbol(currency),
            self.net().format_with_symbol(currency)
        ));

        let outcome = if self.net().is_negative() {
            "Deficit"
        } else {
            "Surplus"
        };
        output.push_str(&format!(
            "\n{} for the year: {}\n",
            outcome,
            self.net().abs().format_with_symbol(currency)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        writeln!(writer, "Month,Income,Expenses,Net")
            .map_err(|e| BudgetError::Export(e.to_string()))?;

        for month in &self.months {
            writeln!(
                writer,
                "{},{:.2},{:.2},{:.2}",
                month.key,
                month.income.value(),
                month.expenses.value(),
                month.net().value()
            )
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        }

        writeln!(
            writer,
            "TOTAL,{:.2},{:.2},{:.2}",
            self.total_income.value(),
            self.total_expenses.value(),
            self.net().value()
        )
        .map_err(|e| BudgetError::Export(e.to_string()))?;

        Ok(())
    }
}
