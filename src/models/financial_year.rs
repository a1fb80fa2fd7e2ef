//! Financial year representation
//!
//! A financial year runs from July 1 of its start year through June 30 of the
//! following year and is labelled `"{start}-{end}"`, e.g. `"2024-2025"`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::transaction::Transaction;

/// Month in which a financial year starts
pub const FIRST_MONTH: u32 = 7;

/// A July-to-June financial year, identified by the calendar year it starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    /// Create the financial year starting July 1 of `start_year`
    pub const fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The financial year a date belongs to
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= FIRST_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// July 1 of the start year
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, FIRST_MONTH, 1).unwrap_or(NaiveDate::MIN)
    }

    /// June 30 of the end year (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year(), 6, 30).unwrap_or(NaiveDate::MAX)
    }

    /// Check if a date falls within this financial year
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    pub fn next(&self) -> Self {
        Self::new(self.start_year + 1)
    }

    pub fn prev(&self) -> Self {
        Self::new(self.start_year - 1)
    }

    /// The twelve `(year, month)` pairs of this financial year, July first
    pub fn months(&self) -> Vec<(i32, u32)> {
        (FIRST_MONTH..=12)
            .map(|m| (self.start_year, m))
            .chain((1..FIRST_MONTH).map(|m| (self.end_year(), m)))
            .collect()
    }

    /// The twelve `YYYY-MM` month keys of this financial year, July first
    pub fn month_keys(&self) -> Vec<String> {
        self.months()
            .into_iter()
            .map(|(y, m)| format!("{:04}-{:02}", y, m))
            .collect()
    }

    /// Parse a `"Y1-Y2"` label
    pub fn parse(s: &str) -> Result<Self, FinancialYearParseError> {
        let s = s.trim();
        let invalid = || FinancialYearParseError::InvalidFormat(s.to_string());

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        if start.len() != 4 || end.len() != 4 {
            return Err(invalid());
        }

        let start: i32 = start.parse().map_err(|_| invalid())?;
        let end: i32 = end.parse().map_err(|_| invalid())?;

        if end != start + 1 {
            return Err(FinancialYearParseError::NotConsecutive { start, end });
        }

        Ok(Self::new(start))
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year())
    }
}

impl FromStr for FinancialYear {
    type Err = FinancialYearParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = FinancialYearParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FinancialYear> for String {
    fn from(fy: FinancialYear) -> Self {
        fy.to_string()
    }
}

/// The financial year containing `today`
pub fn current_financial_year(today: NaiveDate) -> FinancialYear {
    FinancialYear::containing(today)
}

/// Resolve a label to its inclusive `[July 1, June 30]` date range
pub fn resolve_range(label: &str) -> Result<(NaiveDate, NaiveDate), FinancialYearParseError> {
    let fy = FinancialYear::parse(label)?;
    Ok((fy.start_date(), fy.end_date()))
}

/// Financial years worth offering for selection, oldest first
///
/// Always includes the current and the next financial year, plus every year
/// that has at least one transaction.
pub fn available_financial_years<'a, I>(transactions: I, today: NaiveDate) -> Vec<FinancialYear>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let current = current_financial_year(today);
    let mut years: BTreeSet<FinancialYear> = transactions
        .into_iter()
        .map(|t| FinancialYear::containing(t.date))
        .collect();
    years.insert(current);
    years.insert(current.next());
    years.into_iter().collect()
}

/// Error type for financial year parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialYearParseError {
    InvalidFormat(String),
    NotConsecutive { start: i32, end: i32 },
}

impl fmt::Display for FinancialYearParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(
                f,
                "Invalid financial year '{}': expected a label like 2024-2025",
                s
            ),
            Self::NotConsecutive { start, end } => write!(
                f,
                "Invalid financial year {}-{}: the end year must follow the start year",
                start, end
            ),
        }
    }
}

impl std::error::Error for FinancialYearParseError {}
