//! Draw settlement
//!
//! Resolves every PENDING ticket of one draw key against its published
//! result, inside a single transaction. A ticket transitions WON or LOST
//! exactly once (compare-and-swap from PENDING), winnings are credited
//! through the ledger in the same unit, and any mid-loop failure rolls
//! the whole settlement back, leaving every ticket PENDING for a safe
//! retry. Re-running a settled draw finds no pending tickets and is a
//! cheap no-op.

use crate::error::EngineError;
use crate::Engine;
use lotobank_core::{Amount, DrawKey};
use lotobank_ledger::{EntryKind, LedgerEffect, WalletRepo};
use lotobank_store::{BetKind, BetStatus, BetTicket, DrawResult, ResultRepo, StoreError, TicketRepo};
use rusqlite::Transaction;
use serde::{Deserialize, Serialize};

/// Outcome of settling one draw key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SettlementSummary {
    /// Tickets transitioned to WON
    pub won: usize,
    /// Tickets transitioned to LOST
    pub lost: usize,
    /// Total winnings credited
    pub paid_out: Amount,
}

impl Engine {
    /// Settle all pending tickets for one draw key.
    ///
    /// Fails with `ResultNotPublished` if no result exists for the key.
    /// No pending tickets is success with a zero summary, which makes
    /// the operation idempotent and safe to retrigger. Any other failure
    /// is surfaced as `SettlementFailed` carrying the draw key, with the
    /// entire unit rolled back.
    pub fn settle(&self, key: &DrawKey) -> Result<SettlementSummary, EngineError> {
        let mut conn = self.db().lock();
        let tx = conn.transaction()?;

        let result = match ResultRepo::get(&tx, key) {
            Ok(result) => result,
            Err(StoreError::NotFound { .. }) => {
                return Err(EngineError::ResultNotPublished {
                    station: key.station.clone(),
                    date: key.date,
                })
            }
            Err(err) => return Err(settlement_failed(key, err.into())),
        };

        let pending =
            TicketRepo::list_pending(&tx, key).map_err(|err| settlement_failed(key, err.into()))?;
        if pending.is_empty() {
            tracing::debug!(draw = %key, "no pending tickets, settlement is a no-op");
            return Ok(SettlementSummary::default());
        }

        let summary = self
            .settle_tickets(&tx, &result, &pending)
            .map_err(|err| settlement_failed(key, err))?;

        tx.commit().map_err(|err| settlement_failed(key, err.into()))?;

        tracing::info!(
            draw = %key,
            won = summary.won,
            lost = summary.lost,
            paid_out = %summary.paid_out,
            "draw settled"
        );
        Ok(summary)
    }

    fn settle_tickets(
        &self,
        tx: &Transaction<'_>,
        result: &DrawResult,
        pending: &[BetTicket],
    ) -> Result<SettlementSummary, EngineError> {
        let mut summary = SettlementSummary::default();

        for ticket in pending {
            let winnings = self
                .winnings_for(result, ticket)
                .ok_or(EngineError::PayoutOverflow(ticket.id))?;

            if winnings.is_zero() {
                TicketRepo::transition(tx, ticket.id, BetStatus::Lost, Amount::ZERO)?;
                summary.lost += 1;
                tracing::debug!(ticket = ticket.id, number = %ticket.number, "lost");
                continue;
            }

            TicketRepo::transition(tx, ticket.id, BetStatus::Won, winnings)?;
            let effect = LedgerEffect::credit(
                winnings,
                EntryKind::Win,
                format!(
                    "Won bet {} {} ({})",
                    ticket.kind,
                    ticket.number,
                    result.key()
                ),
            );
            WalletRepo::apply_effects(tx, &ticket.user_id, &[effect])?;

            summary.won += 1;
            summary.paid_out = summary
                .paid_out
                .checked_add(&winnings)
                .ok_or(EngineError::PayoutOverflow(ticket.id))?;
            tracing::debug!(ticket = ticket.id, number = %ticket.number, %winnings, "won");
        }

        Ok(summary)
    }

    /// Winnings for one ticket against one result (pure).
    ///
    /// `None` on Decimal overflow.
    fn winnings_for(&self, result: &DrawResult, ticket: &BetTicket) -> Option<Amount> {
        match ticket.kind {
            BetKind::De => {
                if ticket.number == result.special_number() {
                    self.rates().de_winnings(ticket.stake)
                } else {
                    Some(Amount::ZERO)
                }
            }
            BetKind::Lo => {
                let hits = result.hits(ticket.number);
                self.rates().lo_winnings(ticket.stake, hits)
            }
        }
    }
}

fn settlement_failed(key: &DrawKey, source: EngineError) -> EngineError {
    EngineError::SettlementFailed {
        station: key.station.clone(),
        date: key.date,
        source: Box::new(source),
    }
}
