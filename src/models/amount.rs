//! Amount type for representing currency values
//!
//! Amounts are decimal magnitudes held as `f64`. Transactions and budgets
//! always store non-negative values; direction comes from the transaction type.
//! Derived values (net position, remaining budget) may be negative.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A currency amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount from a raw value
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Get the raw value
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount typed by the user
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,250", "10".
    /// The sign is preserved so callers can reject negatives.
    pub fn parse(s: &str) -> Result<Self, AmountParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim_start()),
            None => (false, trimmed),
        };

        let value = parse_unsigned(rest).ok_or_else(|| AmountParseError(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Parse an amount from an imported file, keeping only its magnitude
    ///
    /// On top of [`Amount::parse`] this tolerates accounting parentheses
    /// ("(45.00)") and trailing minus signs ("45.00-").
    pub fn parse_magnitude(s: &str) -> Result<Self, AmountParseError> {
        let trimmed = s.trim();

        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .or_else(|| trimmed.strip_suffix('-'))
            .unwrap_or(trimmed);

        Self::parse(inner)
            .map(|amount| amount.abs())
            .map_err(|_| AmountParseError(s.to_string()))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{:.2}", symbol, self.0.abs())
        } else {
            format!("{}{:.2}", symbol, self.0)
        }
    }
}

fn parse_unsigned(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_prefix('$').unwrap_or(s).trim();
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() || cleaned.starts_with(['-', '+']) {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> std::iter::Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for amount parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountParseError(pub String);

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid amount: '{}'", self.0)
    }
}

impl std::error::Error for AmountParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Amount::new(10.5)), "$10.50");
        assert_eq!(format!("{}", Amount::zero()), "$0.00");
        assert_eq!(format!("{}", Amount::new(-10.5)), "-$10.50");
        assert_eq!(format!("{}", Amount::new(0.05)), "$0.05");
        assert_eq!(Amount::new(3.0).format_with_symbol("€"), "€3.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::new(1000.0);
        let b = Amount::new(500.0);

        assert_eq!((a + b).value(), 1500.0);
        assert_eq!((a - b).value(), 500.0);
        assert_eq!((-a).value(), -1000.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Amount::parse("10.50").unwrap().value(), 10.5);
        assert_eq!(Amount::parse("$10.50").unwrap().value(), 10.5);
        assert_eq!(Amount::parse("-10.50").unwrap().value(), -10.5);
        assert_eq!(Amount::parse("1,250").unwrap().value(), 1250.0);
        assert_eq!(Amount::parse(" 10 ").unwrap().value(), 10.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Amount::parse("").is_err());
        assert!(Amount::parse("abc").is_err());
        assert!(Amount::parse("--5").is_err());
        assert!(Amount::parse("NaN").is_err());
        assert!(Amount::parse("inf").is_err());
    }

    #[test]
    fn test_parse_magnitude() {
        assert_eq!(Amount::parse_magnitude("-45.00").unwrap().value(), 45.0);
        assert_eq!(Amount::parse_magnitude("(45.00)").unwrap().value(), 45.0);
        assert_eq!(Amount::parse_magnitude("$1,200.50").unwrap().value(), 1200.5);
        assert_eq!(Amount::parse_magnitude("-$12").unwrap().value(), 12.0);
        assert_eq!(Amount::parse_magnitude("12-").unwrap().value(), 12.0);
        assert!(Amount::parse_magnitude("twelve").is_err());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Amount::new(100.0), Amount::new(200.0), Amount::new(300.0)];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total.value(), 600.0);
    }

    #[test]
    fn test_serialization() {
        let a = Amount::new(10.5);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "10.5");

        let deserialized: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(a, deserialized);
    }
}
