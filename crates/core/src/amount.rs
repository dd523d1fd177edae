//! Amount - Non-negative decimal wrapper for monetary amounts
//!
//! Stakes, winnings and wallet balances in LotoBank are never negative.
//! This is enforced at the type level; signed movements exist only as
//! ledger-entry deltas.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when constructing an amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative decimal amount.
///
/// # Invariant
/// The inner value is always >= 0. This is enforced by the constructor.
///
/// # Example
/// ```
/// use lotobank_core::Amount;
/// use rust_decimal::Decimal;
///
/// let stake = Amount::new(Decimal::new(10_000, 0)).unwrap();
/// assert_eq!(stake.value(), Decimal::new(10_000, 0));
///
/// assert!(Amount::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Amount from a Decimal.
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            Err(AmountError::Negative(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Create an Amount without validation.
    ///
    /// # Safety
    /// The caller MUST ensure the value is non-negative. Use only for
    /// trusted sources (e.g. rows read back from validated storage).
    #[inline]
    pub const fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    /// Get the inner Decimal value
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition - None on Decimal overflow
    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction - None if the result would be negative
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        let result = self.0.checked_sub(other.0)?;
        if result < Decimal::ZERO {
            None
        } else {
            Some(Amount(result))
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(10000)).unwrap();
        assert_eq!(amount.value(), dec!(10000));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let result = Amount::new(dec!(-10000));
        assert!(matches!(result, Err(AmountError::Negative(_))));
    }

    #[test]
    fn test_checked_sub_prevents_negative() {
        let balance = Amount::new(dec!(5000)).unwrap();
        let stake = Amount::new(dec!(10000)).unwrap();
        assert!(balance.checked_sub(&stake).is_none());
    }

    #[test]
    fn test_checked_sub_success() {
        let balance = Amount::new(dec!(50000)).unwrap();
        let stake = Amount::new(dec!(10000)).unwrap();
        let left = balance.checked_sub(&stake).unwrap();
        assert_eq!(left.value(), dec!(40000));
    }

    #[test]
    fn test_serde_roundtrip() {
        let amount = Amount::new(dec!(104347.83)).unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(amount, parsed);
    }
}
