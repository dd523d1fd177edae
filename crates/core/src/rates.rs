//! PayoutRates - Immutable payout configuration
//!
//! The two bet kinds pay out at fixed rational rates. Rates are a
//! per-deployment value captured once at engine construction; they must
//! never change for results that were already settled. Winnings are
//! computed in exact decimal arithmetic and rounded once, to
//! [`MONEY_DP`] fractional digits.

use crate::amount::Amount;
use rust_decimal::Decimal;

/// Fixed monetary scale: all stored amounts use 2 fractional digits.
pub const MONEY_DP: u32 = 2;

/// Payout rates for the two bet kinds.
///
/// Defaults follow the classic book: 70x the stake for a DE hit, 80/23x
/// the stake per LO appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutRates {
    de: Decimal,
    lo_per_hit: Decimal,
}

impl PayoutRates {
    /// Create custom rates
    pub fn new(de: Decimal, lo_per_hit: Decimal) -> Self {
        Self { de, lo_per_hit }
    }

    /// DE rate (multiplier of the stake on an exact special-number hit)
    pub fn de(&self) -> Decimal {
        self.de
    }

    /// LO rate (multiplier of the stake per appearance)
    pub fn lo_per_hit(&self) -> Decimal {
        self.lo_per_hit
    }

    /// Winnings for a DE ticket that hit the special number.
    ///
    /// `None` on Decimal overflow.
    pub fn de_winnings(&self, stake: Amount) -> Option<Amount> {
        let raw = stake.value().checked_mul(self.de)?;
        Some(Amount::new_unchecked(raw.round_dp(MONEY_DP)))
    }

    /// Winnings for a LO ticket whose number appeared `hits` times.
    ///
    /// Zero hits pay zero. `None` on Decimal overflow.
    pub fn lo_winnings(&self, stake: Amount, hits: u32) -> Option<Amount> {
        if hits == 0 {
            return Some(Amount::ZERO);
        }
        let raw = stake
            .value()
            .checked_mul(self.lo_per_hit)?
            .checked_mul(Decimal::from(hits))?;
        Some(Amount::new_unchecked(raw.round_dp(MONEY_DP)))
    }
}

impl Default for PayoutRates {
    fn default() -> Self {
        Self {
            de: Decimal::from(70),
            lo_per_hit: Decimal::from(80) / Decimal::from(23),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_de_winnings() {
        let rates = PayoutRates::default();
        let stake = Amount::new(dec!(10000)).unwrap();
        assert_eq!(rates.de_winnings(stake).unwrap().value(), dec!(700000.00));
    }

    #[test]
    fn test_lo_winnings_three_hits() {
        let rates = PayoutRates::default();
        let stake = Amount::new(dec!(10000)).unwrap();
        // 10000 * 80/23 * 3 = 104347.826086..., rounded to 2 digits
        assert_eq!(rates.lo_winnings(stake, 3).unwrap().value(), dec!(104347.83));
    }

    #[test]
    fn test_lo_zero_hits_pays_zero() {
        let rates = PayoutRates::default();
        let stake = Amount::new(dec!(10000)).unwrap();
        assert!(rates.lo_winnings(stake, 0).unwrap().is_zero());
    }

    #[test]
    fn test_custom_rates() {
        let rates = PayoutRates::new(dec!(70), dec!(80) / dec!(20));
        let stake = Amount::new(dec!(1000)).unwrap();
        assert_eq!(rates.lo_winnings(stake, 2).unwrap().value(), dec!(8000.00));
    }

    #[test]
    fn test_overflow_is_none_not_panic() {
        let rates = PayoutRates::default();
        let stake = Amount::new(Decimal::MAX).unwrap();
        assert!(rates.de_winnings(stake).is_none());
        assert!(rates.lo_winnings(stake, 3).is_none());
    }
}
