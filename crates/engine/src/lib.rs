//! LotoBank Engine - Atomic bet placement, deletion and settlement
//!
//! The engine owns the database handle and the payout configuration, and
//! exposes every multi-step mutation of the system as one SQLite
//! transaction: placing bets, deleting a pending bet, publishing a draw
//! result and settling a draw. Money moves only through
//! `lotobank_ledger`, ticket state only through `lotobank_store`, and a
//! failure anywhere inside an operation rolls the whole unit back.

pub mod db;
pub mod error;
pub mod place;
pub mod settle;

pub use db::Db;
pub use error::EngineError;
pub use place::{PlacementRequest, PlacementSummary};
pub use settle::SettlementSummary;

use chrono::NaiveDate;
use lotobank_core::{Amount, DrawKey, PayoutRates, Station};
use lotobank_ledger::{EntryKind, LedgerEffect, LedgerEntry, WalletRepo};
use lotobank_store::{BetTicket, DrawResult, ResultRepo, StationRepo, TicketRepo};
use rust_decimal::Decimal;
use std::path::Path;

/// The settlement and ledger-consistency engine.
///
/// Cheap to clone; clones share the same database handle. Payout rates
/// are captured at construction and never change afterwards.
#[derive(Clone)]
pub struct Engine {
    db: Db,
    rates: PayoutRates,
}

impl Engine {
    /// Create an engine over an existing database handle
    pub fn new(db: Db, rates: PayoutRates) -> Self {
        Self { db, rates }
    }

    /// Open (or create) a file-backed database
    pub fn open<P: AsRef<Path>>(path: P, rates: PayoutRates) -> Result<Self, EngineError> {
        Ok(Self::new(Db::open(path)?, rates))
    }

    /// In-memory engine (for tests)
    pub fn in_memory(rates: PayoutRates) -> Result<Self, EngineError> {
        Ok(Self::new(Db::in_memory()?, rates))
    }

    /// Payout rates in effect
    pub fn rates(&self) -> &PayoutRates {
        &self.rates
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    // === Wallets ===

    /// Open a wallet for the user. Idempotent.
    pub fn open_wallet(&self, user_id: &str) -> Result<(), EngineError> {
        let conn = self.db.lock();
        WalletRepo::open(&conn, user_id)?;
        Ok(())
    }

    /// Credit funds into a wallet, opening it if needed.
    ///
    /// `external_id` is the reference of the external payment that backs
    /// the deposit. Returns the new balance.
    pub fn deposit(
        &self,
        user_id: &str,
        amount: Amount,
        external_id: Option<&str>,
    ) -> Result<Decimal, EngineError> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        WalletRepo::open(&tx, user_id)?;
        let mut effect = LedgerEffect::credit(amount, EntryKind::Deposit, "Deposit");
        if let Some(external_id) = external_id {
            effect = effect.with_external_id(external_id);
        }
        let balance = WalletRepo::apply_effects(&tx, user_id, &[effect])?;
        tx.commit()?;
        tracing::info!(user = user_id, %amount, balance = %balance, "deposit applied");
        Ok(balance)
    }

    /// Debit funds out of a wallet. Returns the new balance.
    pub fn withdraw(&self, user_id: &str, amount: Amount) -> Result<Decimal, EngineError> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let effect = LedgerEffect::debit(amount, EntryKind::Withdraw, "Withdrawal");
        let balance = WalletRepo::apply_effects(&tx, user_id, &[effect])?;
        tx.commit()?;
        tracing::info!(user = user_id, %amount, balance = %balance, "withdrawal applied");
        Ok(balance)
    }

    /// Current balance
    pub fn balance(&self, user_id: &str) -> Result<Decimal, EngineError> {
        let conn = self.db.lock();
        Ok(WalletRepo::balance(&conn, user_id)?)
    }

    /// Ledger history, newest first
    pub fn history(&self, user_id: &str) -> Result<Vec<LedgerEntry>, EngineError> {
        let conn = self.db.lock();
        Ok(WalletRepo::entries(&conn, user_id)?)
    }

    /// Verify balance == sum of ledger deltas for the user
    pub fn audit(&self, user_id: &str) -> Result<Decimal, EngineError> {
        let conn = self.db.lock();
        Ok(WalletRepo::audit(&conn, user_id)?)
    }

    // === Stations and results ===

    /// Register or update a draw station
    pub fn register_station(&self, station: &Station) -> Result<(), EngineError> {
        let conn = self.db.lock();
        StationRepo::upsert(&conn, station)?;
        Ok(())
    }

    /// Look up one station
    pub fn station(&self, identifier: &str) -> Result<Station, EngineError> {
        let conn = self.db.lock();
        Ok(StationRepo::get(&conn, identifier)?)
    }

    /// All registered stations
    pub fn stations(&self) -> Result<Vec<Station>, EngineError> {
        let conn = self.db.lock();
        Ok(StationRepo::list(&conn)?)
    }

    /// Publish a draw result.
    ///
    /// Derives the special number and appearance multiset from the prize
    /// list, validates the prize count against the station configuration,
    /// and stores the result. Results are immutable: publishing twice for
    /// the same draw key fails with `DuplicateResult`.
    pub fn publish_result(
        &self,
        key: &DrawKey,
        prizes: Vec<String>,
    ) -> Result<DrawResult, EngineError> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let station = StationRepo::get(&tx, &key.station)?;
        let result = DrawResult::derive(key.clone(), prizes, station.prize_count)?;
        ResultRepo::put(&tx, &result)?;
        tx.commit()?;
        tracing::info!(
            draw = %key,
            special = %result.special_number(),
            "result published"
        );
        Ok(result)
    }

    /// Load a published result
    pub fn result(&self, key: &DrawKey) -> Result<DrawResult, EngineError> {
        let conn = self.db.lock();
        Ok(ResultRepo::get(&conn, key)?)
    }

    // === Tickets (read paths) ===

    /// A user's tickets for one draw date, newest first
    pub fn tickets_for(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<BetTicket>, EngineError> {
        let conn = self.db.lock();
        Ok(TicketRepo::list_for_user(&conn, user_id, date)?)
    }

    /// All pending tickets for one draw key
    pub fn pending_tickets(&self, key: &DrawKey) -> Result<Vec<BetTicket>, EngineError> {
        let conn = self.db.lock();
        Ok(TicketRepo::list_pending(&conn, key)?)
    }
}
