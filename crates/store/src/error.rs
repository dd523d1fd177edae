//! Store errors

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Result already published for {station}/{date}")]
    DuplicateResult { station: String, date: NaiveDate },

    #[error("Invalid prize count for {station}: expected {expected}, got {actual}")]
    InvalidPrizeCount {
        station: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid prize at index {index}: {value:?}")]
    InvalidPrize { index: usize, value: String },

    #[error("Pending ticket already exists for (user {user}, {station}/{date}, {kind}, {number})")]
    DuplicateTicket {
        user: String,
        station: String,
        date: NaiveDate,
        kind: String,
        number: String,
    },

    #[error("Ticket {ticket} is not pending (status {status})")]
    InvalidTransition { ticket: i64, status: String },

    #[error("Corrupt store row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Is this a SQLite unique-constraint violation?
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
