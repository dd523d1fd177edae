//! Engine errors

use chrono::NaiveDate;
use lotobank_ledger::LedgerError;
use lotobank_store::StoreError;
use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No result published for {station}/{date}")]
    ResultNotPublished { station: String, date: NaiveDate },

    #[error("Betting closed for {station}/{date}")]
    BettingClosed { station: String, date: NaiveDate },

    #[error("Placement must name at least one number")]
    EmptyPlacement,

    #[error("Decimal overflow computing the total stake")]
    StakeOverflow,

    #[error("Decimal overflow computing the payout for ticket {0}")]
    PayoutOverflow(i64),

    #[error("Settlement failed for {station}/{date}: {source}")]
    SettlementFailed {
        station: String,
        date: NaiveDate,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Is this an insufficient-funds failure?
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::Ledger(LedgerError::InsufficientFunds { .. }))
    }
}
