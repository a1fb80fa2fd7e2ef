//! Category model
//!
//! A named budget bucket. Expense categories carry a spending cap, income
//! categories a target. Transactions refer to categories by name.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::Amount;
use super::ids::CategoryId;
use super::transaction::TransactionType;

/// A budget category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    #[serde(default)]
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Income or expense
    #[serde(rename = "type")]
    pub category_type: TransactionType,

    /// Budget cap (expense) or target (income) for the financial year
    #[serde(default)]
    pub budget: Amount,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, category_type: TransactionType, budget: Amount) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            category_type,
            budget,
        }
    }

    /// Create a new income category
    pub fn income(name: impl Into<String>, budget: f64) -> Self {
        Self::new(name, TransactionType::Income, Amount::new(budget))
    }

    /// Create a new expense category
    pub fn expense(name: impl Into<String>, budget: f64) -> Self {
        Self::new(name, TransactionType::Expense, Amount::new(budget))
    }

    pub fn is_income(&self) -> bool {
        self.category_type == TransactionType::Income
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !self.budget.value().is_finite() || self.budget.is_negative() {
            return Err(CategoryValidationError::NegativeBudget);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeBudget,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::NegativeBudget => write!(f, "Budget must be a non-negative number"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::expense("Food", 600.0);

        assert_eq!(category.name, "Food");
        assert_eq!(category.category_type, TransactionType::Expense);
        assert_eq!(category.budget.value(), 600.0);
        assert!(!category.is_income());
    }

    #[test]
    fn test_category_validation() {
        let mut category = Category::income("Salary", 5000.0);
        assert!(category.validate().is_ok());

        category.name = String::new();
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::EmptyName)
        );

        category.name = "a".repeat(51);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));

        category.name = "Salary".to_string();
        category.budget = Amount::new(-1.0);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NegativeBudget)
        );
    }

    #[test]
    fn test_zero_budget_is_valid() {
        assert!(Category::expense("Gifts", 0.0).validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let category = Category::income("Freelance", 1000.0);
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["type"], "Income");
        assert_eq!(json["budget"], 1000.0);

        let deserialized: Category = serde_json::from_value(json).unwrap();
        assert_eq!(category, deserialized);
    }

    #[test]
    fn test_missing_id_and_budget_default() {
        let category: Category =
            serde_json::from_str(r#"{"name": "Pets", "type": "Expense"}"#).unwrap();
        assert_eq!(category.name, "Pets");
        assert!(category.budget.is_zero());
    }
}
