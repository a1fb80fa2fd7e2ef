//! Transaction model
//!
//! A dated income or expense record. The amount is always a non-negative
//! magnitude; the transaction type decides which total it counts towards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::amount::Amount;
use super::ids::TransactionId;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Both types, income first
    pub fn all() -> &'static [Self] {
        &[Self::Income, Self::Expense]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Parse a type name. Imports require the exact spelling, so this is
    /// case-sensitive; the CLI layer lowercases its own input beforehand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            other => Err(format!(
                "Invalid type '{}': expected 'Income' or 'Expense'",
                other
            )),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Non-negative amount
    pub amount: Amount,

    /// Category name (may refer to a category that no longer exists)
    pub category: String,

    /// Income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// When the transaction was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        transaction_type: TransactionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            description: description.into(),
            amount,
            category: category.into(),
            transaction_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Whether the amount is large enough to be flagged
    pub fn exceeds_threshold(&self, threshold: Amount) -> bool {
        self.amount > threshold
    }

    /// Mark the transaction as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.value().is_finite() {
            return Err(TransactionValidationError::InvalidAmount);
        }

        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }

        let chars = self.description.chars().count();
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(TransactionValidationError::DescriptionTooLong(chars));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount,
            self.transaction_type
        )
    }
}

/// Longest description accepted, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    InvalidAmount,
    NegativeAmount(Amount),
    MissingCategory,
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount => write!(f, "Amount must be a number"),
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative ({})", amount)
            }
            Self::MissingCategory => write!(f, "Transaction must have a category"),
            Self::DescriptionTooLong(len) => {
                write!(
                    f,
                    "Description too long ({} chars, max {})",
                    len, MAX_DESCRIPTION_CHARS
                )
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
