//! LotoBank Core - Domain types
//!
//! This crate contains the fundamental types used across LotoBank:
//! - `Amount`: Non-negative decimal wrapper for monetary amounts
//! - `BetNumber`: Two-digit lottery number ("00".."99")
//! - `Station`, `Region`, `ScheduleDays`: Draw channel configuration
//! - `DrawKey`: (station, date) identifier of one published draw
//! - `PayoutRates`: Immutable per-deployment payout configuration

pub mod amount;
pub mod draw;
pub mod number;
pub mod rates;
pub mod station;

pub use amount::{Amount, AmountError};
pub use draw::DrawKey;
pub use number::{BetNumber, NumberError};
pub use rates::{PayoutRates, MONEY_DP};
pub use station::{Region, ScheduleDays, Station, StationError};
