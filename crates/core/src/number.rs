//! BetNumber - Two-digit lottery number
//!
//! Both bet kinds target the last two digits of a prize, so every playable
//! number is exactly "00".."99". Leading zeros are significant in display
//! and storage ("05" is a different string than "5"), so parsing requires
//! exactly two ASCII digits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing bet numbers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("Bet number must be exactly two digits: {0:?}")]
    Invalid(String),
}

/// A two-digit lottery number in "00".."99".
///
/// # Examples
/// ```
/// use lotobank_core::BetNumber;
///
/// let n: BetNumber = "45".parse().unwrap();
/// assert_eq!(n.to_string(), "45");
///
/// let low: BetNumber = "05".parse().unwrap();
/// assert_eq!(low.to_string(), "05");
///
/// assert!("5".parse::<BetNumber>().is_err());
/// assert!("123".parse::<BetNumber>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BetNumber(u8);

impl BetNumber {
    /// Create from a raw value < 100.
    pub fn new(value: u8) -> Result<Self, NumberError> {
        if value < 100 {
            Ok(Self(value))
        } else {
            Err(NumberError::Invalid(value.to_string()))
        }
    }

    /// Extract the number from a prize string: its last two characters.
    ///
    /// Returns an error if the prize has fewer than two trailing digits.
    pub fn from_prize(prize: &str) -> Result<Self, NumberError> {
        let digits: Vec<char> = prize.chars().collect();
        if digits.len() < 2 {
            return Err(NumberError::Invalid(prize.to_string()));
        }
        let tail: String = digits[digits.len() - 2..].iter().collect();
        tail.parse()
    }

    /// Raw value 0..=99
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for BetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for BetNumber {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(NumberError::Invalid(s.to_string()));
        }
        let value: u8 = s.parse().map_err(|_| NumberError::Invalid(s.to_string()))?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for BetNumber {
    type Error = NumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BetNumber> for String {
    fn from(n: BetNumber) -> Self {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_digits() {
        let n: BetNumber = "86".parse().unwrap();
        assert_eq!(n.value(), 86);
        assert_eq!(n.to_string(), "86");
    }

    #[test]
    fn test_leading_zero_preserved() {
        let n: BetNumber = "05".parse().unwrap();
        assert_eq!(n.value(), 5);
        assert_eq!(n.to_string(), "05");
    }

    #[test]
    fn test_reject_wrong_length() {
        assert!("5".parse::<BetNumber>().is_err());
        assert!("123".parse::<BetNumber>().is_err());
        assert!("".parse::<BetNumber>().is_err());
    }

    #[test]
    fn test_reject_non_digits() {
        assert!("4a".parse::<BetNumber>().is_err());
        assert!("-5".parse::<BetNumber>().is_err());
    }

    #[test]
    fn test_from_prize_takes_last_two() {
        let n = BetNumber::from_prize("512345").unwrap();
        assert_eq!(n.to_string(), "45");

        let n = BetNumber::from_prize("00105").unwrap();
        assert_eq!(n.to_string(), "05");
    }

    #[test]
    fn test_from_prize_rejects_short_or_garbage() {
        assert!(BetNumber::from_prize("7").is_err());
        assert!(BetNumber::from_prize("ab").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let n: BetNumber = "07".parse().unwrap();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"07\"");
        let parsed: BetNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, n);
    }
}
