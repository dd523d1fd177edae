//! Ledger errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("Balance overflow applying delta {0}")]
    Overflow(Decimal),

    #[error("Ledger does not match balance for {user}: balance {balance}, entry sum {entry_sum}")]
    BalanceMismatch {
        user: String,
        balance: Decimal,
        entry_sum: Decimal,
    },

    #[error("Corrupt ledger row: {0}")]
    Corrupt(String),
}
