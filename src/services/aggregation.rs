//! Aggregation engine
//!
//! Pure functions that derive totals, monthly series and per-category budget
//! figures from the transaction and category collections for one financial
//! year. Nothing here is cached or fallible: every view is recomputed on
//! demand from whatever the stores currently hold.
//!
//! Transactions are matched to categories by name. A transaction whose
//! category no longer exists still counts towards raw totals but is left out
//! of [`category_breakdown`]; [`unbudgeted`] reports those separately.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Amount, Category, FinancialYear, Transaction, TransactionType};

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthlyTotals {
    pub income: Amount,
    pub expenses: Amount,
}

impl MonthlyTotals {
    pub fn net(&self) -> Amount {
        self.income - self.expenses
    }
}

/// Budget versus actual for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudget {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    pub budget: Amount,
    pub actual: Amount,
    /// `budget - actual` for expenses, `actual - budget` for income
    pub remaining: Amount,
    /// `actual / budget * 100`, or 0 when there is no budget
    pub percentage: f64,
    pub transaction_count: usize,
}

impl CategoryBudget {
    /// Expense category that has spent more than its budget
    pub fn is_over_budget(&self) -> bool {
        self.category_type == TransactionType::Expense && self.actual > self.budget
    }
}

/// Transactions whose category name matches no known category
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnbudgetedBucket {
    pub income: Amount,
    pub expenses: Amount,
    pub count: usize,
    /// The unknown category names, sorted
    pub categories: Vec<String>,
}

impl UnbudgetedBucket {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Transactions dated within the financial year (inclusive)
///
/// Accepts anything that yields transaction references, so the output can be
/// fed back in; filtering twice gives the same result.
pub fn transactions_in_fy<'a, I>(transactions: I, fy: FinancialYear) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| fy.contains(t.date))
        .collect()
}

fn sum_in_fy(transactions: &[Transaction], fy: FinancialYear, kind: TransactionType) -> Amount {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind && fy.contains(t.date))
        .map(|t| t.amount)
        .sum()
}

/// Sum of income amounts in the financial year
pub fn total_income(transactions: &[Transaction], fy: FinancialYear) -> Amount {
    sum_in_fy(transactions, fy, TransactionType::Income)
}

/// Sum of expense amounts in the financial year
pub fn total_expenses(transactions: &[Transaction], fy: FinancialYear) -> Amount {
    sum_in_fy(transactions, fy, TransactionType::Expense)
}

/// Income minus expenses for the financial year
pub fn net_position(transactions: &[Transaction], fy: FinancialYear) -> Amount {
    total_income(transactions, fy) - total_expenses(transactions, fy)
}

/// Sum of all amounts of one type, ignoring dates
pub fn sum_by_type(transactions: &[Transaction], kind: TransactionType) -> Amount {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind)
        .map(|t| t.amount)
        .sum()
}

/// Expenses as a percentage of income, or 0 if either is zero
pub fn budget_utilization(transactions: &[Transaction], fy: FinancialYear) -> f64 {
    let income = total_income(transactions, fy).value();
    let expenses = total_expenses(transactions, fy).value();
    if income > 0.0 && expenses > 0.0 {
        expenses / income * 100.0
    } else {
        0.0
    }
}

/// Key a date by its calendar month, e.g. `2024-08`
pub fn month_key(date: chrono::NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Per-month income and expense totals, keyed by `YYYY-MM`
///
/// Sparse: months without transactions have no entry.
pub fn monthly_series(
    transactions: &[Transaction],
    fy: FinancialYear,
) -> BTreeMap<String, MonthlyTotals> {
    let mut series: BTreeMap<String, MonthlyTotals> = BTreeMap::new();

    for txn in transactions_in_fy(transactions, fy) {
        let totals = series.entry(month_key(txn.date)).or_default();
        match txn.transaction_type {
            TransactionType::Income => totals.income += txn.amount,
            TransactionType::Expense => totals.expenses += txn.amount,
        }
    }

    series
}

/// FY transactions grouped by category name, orphans included
pub fn transactions_by_category(
    transactions: &[Transaction],
    fy: FinancialYear,
) -> BTreeMap<String, Vec<&Transaction>> {
    let mut grouped: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions_in_fy(transactions, fy) {
        grouped.entry(txn.category.clone()).or_default().push(txn);
    }
    grouped
}

/// Budget versus actual for every known category, in category order
///
/// Zero-activity categories are included. Categories sharing a name collapse
/// into one row at the first one's position, taking the type and budget of
/// the last definition. Only transactions with a matching name count.
pub fn category_breakdown(
    categories: &[Category],
    transactions: &[Transaction],
    fy: FinancialYear,
) -> Vec<CategoryBudget> {
    let mut rows: Vec<CategoryBudget> = Vec::with_capacity(categories.len());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for category in categories {
        match index.get(category.name.as_str()) {
            Some(&i) => {
                rows[i].category_type = category.category_type;
                rows[i].budget = category.budget;
            }
            None => {
                index.insert(category.name.as_str(), rows.len());
                rows.push(CategoryBudget {
                    name: category.name.clone(),
                    category_type: category.category_type,
                    budget: category.budget,
                    actual: Amount::zero(),
                    remaining: Amount::zero(),
                    percentage: 0.0,
                    transaction_count: 0,
                });
            }
        }
    }

    for txn in transactions_in_fy(transactions, fy) {
        if let Some(&i) = index.get(txn.category.as_str()) {
            rows[i].actual += txn.amount;
            rows[i].transaction_count += 1;
        }
    }

    for row in &mut rows {
        row.remaining = match row.category_type {
            TransactionType::Expense => row.budget - row.actual,
            TransactionType::Income => row.actual - row.budget,
        };
        row.percentage = if row.budget.value() > 0.0 {
            row.actual.value() / row.budget.value() * 100.0
        } else {
            0.0
        };
    }

    rows
}

/// Totals for FY transactions whose category is not defined
pub fn unbudgeted(
    categories: &[Category],
    transactions: &[Transaction],
    fy: FinancialYear,
) -> UnbudgetedBucket {
    let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let mut bucket = UnbudgetedBucket::default();
    let mut names = std::collections::BTreeSet::new();

    for txn in transactions_in_fy(transactions, fy) {
        if known.contains(txn.category.as_str()) {
            continue;
        }
        match txn.transaction_type {
            TransactionType::Income => bucket.income += txn.amount,
            TransactionType::Expense => bucket.expenses += txn.amount,
        }
        bucket.count += 1;
        names.insert(txn.category.clone());
    }

    bucket.categories = names.into_iter().collect();
    bucket
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(d: NaiveDate, category: &str, amount: f64, kind: TransactionType) -> Transaction {
        Transaction::new(d, category, Amount::new(amount), category, kind)
    }

    fn fy2024() -> FinancialYear {
        FinancialYear::new(2024)
    }

    fn scenario() -> (Vec<Category>, Vec<Transaction>) {
        let categories = vec![
            Category::income("Salary", 5000.0),
            Category::expense("Food", 600.0),
        ];
        let transactions = vec![
            txn(date(2024, 8, 1), "Salary", 4500.0, TransactionType::Income),
            txn(date(2024, 8, 15), "Food", 700.0, TransactionType::Expense),
        ];
        (categories, transactions)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.005
    }

    #[test]
    fn test_scenario_totals() {
        let (_, transactions) = scenario();
        assert_eq!(total_income(&transactions, fy2024()).value(), 4500.0);
        assert_eq!(total_expenses(&transactions, fy2024()).value(), 700.0);
        assert_eq!(net_position(&transactions, fy2024()).value(), 3800.0);
    }

    #[test]
    fn test_scenario_breakdown() {
        let (categories, transactions) = scenario();
        let rows = category_breakdown(&categories, &transactions, fy2024());
        assert_eq!(rows.len(), 2);

        let salary = &rows[0];
        assert_eq!(salary.name, "Salary");
        assert_eq!(salary.actual.value(), 4500.0);
        assert_eq!(salary.remaining.value(), -500.0);
        assert!(approx(salary.percentage, 90.0));

        let food = &rows[1];
        assert_eq!(food.actual.value(), 700.0);
        assert_eq!(food.remaining.value(), -100.0);
        assert!(approx(food.percentage, 116.67));
        assert!(food.is_over_budget());
    }

    #[test]
    fn test_net_equals_income_minus_expenses() {
        let transactions = vec![
            txn(date(2024, 9, 1), "Salary", 1234.56, TransactionType::Income),
            txn(date(2024, 9, 2), "Food", 78.9, TransactionType::Expense),
            txn(date(2025, 2, 2), "Food", 0.1, TransactionType::Expense),
            txn(date(2023, 2, 2), "Food", 999.0, TransactionType::Expense),
        ];
        let fy = fy2024();
        assert_eq!(
            net_position(&transactions, fy),
            total_income(&transactions, fy) - total_expenses(&transactions, fy)
        );
    }

    #[test]
    fn test_transactions_in_fy_is_idempotent() {
        let transactions = vec![
            txn(date(2024, 6, 30), "Food", 1.0, TransactionType::Expense),
            txn(date(2024, 7, 1), "Food", 2.0, TransactionType::Expense),
            txn(date(2025, 6, 30), "Food", 3.0, TransactionType::Expense),
            txn(date(2025, 7, 1), "Food", 4.0, TransactionType::Expense),
        ];

        let once = transactions_in_fy(&transactions, fy2024());
        let twice = transactions_in_fy(once.clone(), fy2024());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
        assert!(transactions_in_fy(&transactions, FinancialYear::new(2030)).is_empty());
    }

    #[test]
    fn test_zero_budget_percentage() {
        let categories = vec![Category::expense("Gifts", 0.0), Category::expense("Idle", 100.0)];
        let transactions = vec![txn(date(2024, 12, 1), "Gifts", 50.0, TransactionType::Expense)];

        let rows = category_breakdown(&categories, &transactions, fy2024());
        assert_eq!(rows[0].percentage, 0.0);
        assert_eq!(rows[0].remaining.value(), -50.0);
        assert_eq!(rows[1].actual.value(), 0.0);
        assert_eq!(rows[1].percentage, 0.0);
        assert_eq!(rows[1].remaining.value(), 100.0);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let categories = vec![
            Category::expense("Food", 600.0),
            Category::expense("Housing", 1200.0),
            Category::expense("Food", 800.0),
        ];
        let transactions = vec![txn(date(2024, 8, 1), "Food", 400.0, TransactionType::Expense)];

        let rows = category_breakdown(&categories, &transactions, fy2024());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Food");
        assert_eq!(rows[0].budget.value(), 800.0);
        assert_eq!(rows[0].actual.value(), 400.0);
        assert!(approx(rows[0].percentage, 50.0));
    }

    #[test]
    fn test_deleted_category_keeps_raw_totals() {
        let (mut categories, transactions) = scenario();
        let before_expenses = total_expenses(&transactions, fy2024());

        categories.retain(|c| c.name != "Food");

        let rows = category_breakdown(&categories, &transactions, fy2024());
        assert!(rows.iter().all(|r| r.name != "Food"));
        assert_eq!(total_expenses(&transactions, fy2024()), before_expenses);

        let bucket = unbudgeted(&categories, &transactions, fy2024());
        assert_eq!(bucket.count, 1);
        assert_eq!(bucket.expenses.value(), 700.0);
        assert_eq!(bucket.categories, vec!["Food".to_string()]);
    }

    #[test]
    fn test_monthly_series_is_sparse() {
        let transactions = vec![
            txn(date(2024, 8, 1), "Salary", 4500.0, TransactionType::Income),
            txn(date(2024, 8, 15), "Food", 700.0, TransactionType::Expense),
            txn(date(2025, 1, 3), "Food", 50.0, TransactionType::Expense),
            txn(date(2025, 8, 1), "Food", 10.0, TransactionType::Expense),
        ];

        let series = monthly_series(&transactions, fy2024());
        assert_eq!(series.len(), 2);
        assert_eq!(series["2024-08"].income.value(), 4500.0);
        assert_eq!(series["2024-08"].expenses.value(), 700.0);
        assert_eq!(series["2024-08"].net().value(), 3800.0);
        assert_eq!(series["2025-01"].expenses.value(), 50.0);
        assert!(!series.contains_key("2024-09"));
    }

    #[test]
    fn test_transactions_by_category_includes_orphans() {
        let transactions = vec![
            txn(date(2024, 8, 1), "Food", 1.0, TransactionType::Expense),
            txn(date(2024, 8, 2), "Mystery", 2.0, TransactionType::Expense),
            txn(date(2024, 8, 3), "Food", 3.0, TransactionType::Expense),
        ];

        let grouped = transactions_by_category(&transactions, fy2024());
        assert_eq!(grouped["Food"].len(), 2);
        assert_eq!(grouped["Mystery"].len(), 1);
    }

    #[test]
    fn test_budget_utilization() {
        let (_, transactions) = scenario();
        assert!(approx(budget_utilization(&transactions, fy2024()), 700.0 / 4500.0 * 100.0));

        let only_expenses = vec![txn(date(2024, 8, 1), "Food", 5.0, TransactionType::Expense)];
        assert_eq!(budget_utilization(&only_expenses, fy2024()), 0.0);
        assert_eq!(budget_utilization(&[], fy2024()), 0.0);
    }

    #[test]
    fn test_sum_by_type_ignores_dates() {
        let transactions = vec![
            txn(date(2019, 1, 1), "Food", 5.0, TransactionType::Expense),
            txn(date(2030, 1, 1), "Food", 6.0, TransactionType::Expense),
            txn(date(2030, 1, 1), "Salary", 7.0, TransactionType::Income),
        ];
        assert_eq!(sum_by_type(&transactions, TransactionType::Expense).value(), 11.0);
        assert_eq!(sum_by_type(&transactions, TransactionType::Income).value(), 7.0);
    }
}
