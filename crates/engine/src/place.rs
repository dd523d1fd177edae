//! Bet placement and deletion
//!
//! Placement debits the wallet and creates (or merges into) pending
//! tickets inside one transaction; deletion reverses the remaining stake
//! with a REFUND entry and removes the ticket. Both consume an explicit
//! local time for the cutoff decision instead of reading the clock.

use crate::error::EngineError;
use crate::Engine;
use chrono::{NaiveDate, NaiveDateTime};
use lotobank_core::{Amount, BetNumber, DrawKey};
use lotobank_ledger::{EntryKind, LedgerEffect, LedgerError, WalletRepo};
use lotobank_store::{BetKind, BetStatus, StationRepo, TicketRepo};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One placement: the same stake on each of a set of numbers, all for
/// one draw key and bet kind.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub user_id: String,
    pub station_id: String,
    pub date: NaiveDate,
    pub kind: BetKind,
    pub numbers: Vec<BetNumber>,
    pub stake_per_number: Amount,
    /// Local time used for the cutoff decision
    pub now_local: NaiveDateTime,
}

/// Outcome of a placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementSummary {
    /// Tickets newly created
    pub created: usize,
    /// Tickets merged into (stake increased)
    pub merged: usize,
    /// Total amount debited
    pub total_staked: Amount,
    /// Wallet balance after the placement
    pub new_balance: Decimal,
}

impl Engine {
    /// Place the same stake on each number of a set.
    ///
    /// Validates that the draw is open for betting and that the balance
    /// covers the full cost, then, per number: finds-or-creates the
    /// pending ticket (merging stakes on an existing one) and records one
    /// BET ledger effect. The whole placement is one transaction; any
    /// failure rolls everything back.
    pub fn place_bets(&self, req: &PlacementRequest) -> Result<PlacementSummary, EngineError> {
        // Set semantics: duplicate numbers in one request collapse
        let mut numbers: Vec<BetNumber> = Vec::with_capacity(req.numbers.len());
        for number in &req.numbers {
            if !numbers.contains(number) {
                numbers.push(*number);
            }
        }
        if numbers.is_empty() {
            return Err(EngineError::EmptyPlacement);
        }

        let mut conn = self.db().lock();
        let tx = conn.transaction()?;

        let station = StationRepo::get(&tx, &req.station_id)?;
        if !station.is_open_at(req.date, req.now_local) {
            return Err(EngineError::BettingClosed {
                station: req.station_id.clone(),
                date: req.date,
            });
        }

        let key = DrawKey::new(req.station_id.clone(), req.date);
        let stake = req.stake_per_number;
        let total = stake
            .value()
            .checked_mul(Decimal::from(numbers.len() as u64))
            .ok_or(EngineError::StakeOverflow)?;

        // Cheap pre-check; the authoritative check is the running-balance
        // guard inside apply_effects.
        let available = WalletRepo::balance(&tx, &req.user_id)?;
        if available < total {
            return Err(LedgerError::InsufficientFunds {
                needed: total,
                available,
            }
            .into());
        }

        let mut created = 0;
        let mut merged = 0;
        let mut new_balance = available;

        for number in &numbers {
            let (ticket, was_created) = TicketRepo::find_or_create_pending(
                &tx,
                &req.user_id,
                &key,
                req.kind,
                *number,
                stake,
            )?;

            let description = if was_created {
                created += 1;
                format!("Bet {} {} for {}", req.kind, number, key)
            } else {
                merged += 1;
                format!("Added to bet {} {} for {} (ticket {})", req.kind, number, key, ticket.id)
            };
            let effect = LedgerEffect::debit(stake, EntryKind::Bet, description);
            new_balance = WalletRepo::apply_effects(&tx, &req.user_id, &[effect])?;
        }

        tx.commit()?;

        let total_staked = Amount::new_unchecked(total);
        tracing::info!(
            user = %req.user_id,
            draw = %key,
            kind = %req.kind,
            created,
            merged,
            staked = %total_staked,
            "bets placed"
        );

        Ok(PlacementSummary {
            created,
            merged,
            total_staked,
            new_balance,
        })
    }

    /// Delete one of the user's PENDING tickets and refund its full
    /// current stake with a REFUND entry.
    ///
    /// Only allowed while the ticket's draw is still open for betting at
    /// `now_local`; afterwards the ticket stays and awaits settlement.
    /// Returns the refunded amount.
    pub fn delete_bet(
        &self,
        user_id: &str,
        ticket_id: i64,
        now_local: NaiveDateTime,
    ) -> Result<Amount, EngineError> {
        let mut conn = self.db().lock();
        let tx = conn.transaction()?;

        let ticket = TicketRepo::get_for_user(&tx, ticket_id, user_id)?;
        if ticket.status != BetStatus::Pending {
            return Err(lotobank_store::StoreError::InvalidTransition {
                ticket: ticket_id,
                status: ticket.status.to_string(),
            }
            .into());
        }

        let station = StationRepo::get(&tx, &ticket.station_id)?;
        if !station.is_open_at(ticket.date, now_local) {
            return Err(EngineError::BettingClosed {
                station: ticket.station_id.clone(),
                date: ticket.date,
            });
        }

        TicketRepo::delete_pending(&tx, ticket_id)?;

        let refund = ticket.stake;
        let effect = LedgerEffect::credit(
            refund,
            EntryKind::Refund,
            format!(
                "Refund for deleted bet {} {} ({})",
                ticket.kind,
                ticket.number,
                ticket.draw_key()
            ),
        );
        WalletRepo::apply_effects(&tx, user_id, &[effect])?;

        tx.commit()?;
        tracing::info!(
            user = user_id,
            ticket = ticket_id,
            refunded = %refund,
            "pending bet deleted"
        );
        Ok(refund)
    }
}
