//! Category display formatting
//!
//! Formats categories for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::format_percentage;
use crate::models::{Amount, Category};
use crate::services::CategoryBudget;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Budget")]
    budget: String,
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
}

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category], currency: &str) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: c.id.to_string(),
        name: c.name.clone(),
        kind: c.category_type.as_str(),
        budget: c.budget.format_with_symbol(currency),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format categories with their budget usage for a financial year
pub fn format_category_budgets(rows: &[CategoryBudget], currency: &str) -> String {
    if rows.is_empty() {
        return "No categories found.".to_string();
    }

    let rows = rows.iter().map(|r| BudgetRow {
        name: if r.is_over_budget() {
            format!("{} *", r.name)
        } else {
            r.name.clone()
        },
        kind: r.category_type.as_str(),
        budget: r.budget.format_with_symbol(currency),
        actual: r.actual.format_with_symbol(currency),
        remaining: r.remaining.format_with_symbol(currency),
        used: format_percentage(r.percentage),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format category details for display
pub fn format_category_details(
    category: &Category,
    budget: Option<&CategoryBudget>,
    currency: &str,
) -> String {
    let money = |amount: Amount| amount.format_with_symbol(currency);
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:     {}\n", category.id));
    output.push_str(&format!("  Type:   {}\n", category.category_type));
    output.push_str(&format!("  Budget: {}\n", money(category.budget)));

    if let Some(b) = budget {
        output.push_str(&format!(
            "  Actual: {} ({} transactions)\n",
            money(b.actual),
            b.transaction_count
        ));
        output.push_str(&format!("  Remaining: {}\n", money(b.remaining)));
        output.push_str(&format!("  Used: {}\n", format_percentage(b.percentage)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    #[test]
    fn test_format_category_list() {
        let categories = vec![
            Category::income("Salary", 5000.0),
            Category::expense("Food", 600.0),
        ];
        let output = format_category_list(&categories, "$");

        assert!(output.contains("Name"));
        assert!(output.contains("Salary"));
        assert!(output.contains("$600.00"));
        assert!(output.contains("cat-"));
    }

    #[test]
    fn test_format_budgets_marks_overspend() {
        let rows = vec![CategoryBudget {
            name: "Food".into(),
            category_type: TransactionType::Expense,
            budget: Amount::new(600.0),
            actual: Amount::new(700.0),
            remaining: Amount::new(-100.0),
            percentage: 116.67,
            transaction_count: 1,
        }];
        let output = format_category_budgets(&rows, "$");

        assert!(output.contains("Food *"));
        assert!(output.contains("-$100.00"));
        assert!(output.contains("117%"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_category_list(&[], "$"), "No categories found.");
    }

    #[test]
    fn test_currency_symbol() {
        let food = Category::expense("Food", 600.0);
        let output = format_category_list(std::slice::from_ref(&food), "€");
        assert!(output.contains("€600.00"));
        assert!(!output.contains('$'));

        let details = format_category_details(&food, None, "£");
        assert!(details.contains("Budget: £600.00"));
    }
}
