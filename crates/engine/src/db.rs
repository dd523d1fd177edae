//! Shared database handle
//!
//! One SQLite connection guarded by a mutex. Every engine operation
//! locks the handle, runs inside a single transaction and commits before
//! releasing, so concurrent callers are serialized at the data-store
//! boundary and can never both read a stale balance.

use crate::error::EngineError;
use lotobank_ledger::WalletRepo;
use lotobank_store::{ResultRepo, StationRepo, TicketRepo};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to the shared SQLite database
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open (or create) a file-backed database and run schema setup
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database (for tests)
    pub fn in_memory() -> Result<Self, EngineError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, EngineError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        WalletRepo::init_schema(&conn)?;
        StationRepo::init_schema(&conn)?;
        ResultRepo::init_schema(&conn)?;
        TicketRepo::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Acquire the connection.
    ///
    /// A poisoned mutex only means another thread panicked mid-operation;
    /// its open transaction rolled back on drop, so the connection itself
    /// is in a clean state and can be reused.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
