//! Ledger entry types
//!
//! A [`LedgerEffect`] is a balance change about to be applied; a
//! [`LedgerEntry`] is one that has been durably recorded. Deltas are
//! signed: credits (DEPOSIT, WIN, REFUND) are positive, debits (WITHDRAW,
//! BET) negative. The sum of all deltas for a wallet equals its balance.

use chrono::{DateTime, Utc};
use lotobank_core::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Kind of a balance-changing event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Funds added from outside
    Deposit,
    /// Funds taken out
    Withdraw,
    /// Stake debited when a bet is placed
    Bet,
    /// Winnings credited by settlement
    Win,
    /// Stake returned for a deleted pending bet
    Refund,
}

/// One signed balance change waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEffect {
    /// Signed delta: positive credits, negative debits
    pub delta: Decimal,
    /// What kind of event this is
    pub kind: EntryKind,
    /// Free-text description for the audit trail
    pub description: String,
    /// Reference id from an external system (payment gateway, etc.)
    pub external_id: Option<String>,
}

impl LedgerEffect {
    /// A credit of `amount` (positive delta)
    pub fn credit(amount: Amount, kind: EntryKind, description: impl Into<String>) -> Self {
        Self {
            delta: amount.value(),
            kind,
            description: description.into(),
            external_id: None,
        }
    }

    /// A debit of `amount` (negative delta)
    pub fn debit(amount: Amount, kind: EntryKind, description: impl Into<String>) -> Self {
        Self {
            delta: -amount.value(),
            kind,
            description: description.into(),
            external_id: None,
        }
    }

    /// Attach an external reference id
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

/// One recorded, immutable balance change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Row id, monotonically increasing in creation order
    pub id: i64,
    /// Wallet owner
    pub user_id: String,
    /// Signed delta applied to the balance
    pub delta: Decimal,
    /// Kind of event
    pub kind: EntryKind,
    /// Free-text description
    pub description: String,
    /// Reference id from an external system
    pub external_id: Option<String>,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}
