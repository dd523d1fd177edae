//! Bet tickets and their lifecycle
//!
//! A ticket is PENDING from placement until settlement flips it to WON or
//! LOST, exactly once. Two guarantees live at the storage layer rather
//! than in application logic:
//!
//! - at most one PENDING ticket per (user, station, date, kind, number),
//!   enforced by a partial unique index; concurrent identical placements
//!   merge into the existing ticket by increasing its stake
//! - status transitions are compare-and-swap conditional updates from
//!   PENDING, so a ticket can never be settled twice

use crate::error::{is_unique_violation, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use lotobank_core::{Amount, BetNumber, DrawKey};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Kind of bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetKind {
    /// "Đề": hits when the number equals the last two digits of the
    /// first prize
    De,
    /// "Lô": hits once per prize whose last two digits equal the number
    Lo,
}

/// Lifecycle state of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

/// One bet ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetTicket {
    pub id: i64,
    pub user_id: String,
    pub station_id: String,
    pub date: NaiveDate,
    pub kind: BetKind,
    pub number: BetNumber,
    pub stake: Amount,
    pub status: BetStatus,
    pub winnings: Amount,
    pub created_at: DateTime<Utc>,
}

impl BetTicket {
    /// Draw key this ticket was placed for
    pub fn draw_key(&self) -> DrawKey {
        DrawKey::new(self.station_id.clone(), self.date)
    }
}

/// SQLite repository for bet tickets
pub struct TicketRepo;

impl TicketRepo {
    /// Create the bets table and its indexes if they do not exist
    pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bets (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id    TEXT NOT NULL,
                station_id TEXT NOT NULL,
                draw_date  TEXT NOT NULL,
                bet_kind   TEXT NOT NULL,
                number     TEXT NOT NULL,
                stake      TEXT NOT NULL,
                status     TEXT NOT NULL DEFAULT 'PENDING',
                winnings   TEXT NOT NULL DEFAULT '0',
                created_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_bets_pending_unique
                ON bets(user_id, station_id, draw_date, bet_kind, number)
                WHERE status = 'PENDING';

            CREATE INDEX IF NOT EXISTS idx_bets_draw
                ON bets(station_id, draw_date, status);",
        )?;
        Ok(())
    }

    /// Find the user's PENDING ticket for the exact key tuple, if any
    pub fn find_pending(
        conn: &Connection,
        user_id: &str,
        key: &DrawKey,
        kind: BetKind,
        number: BetNumber,
    ) -> Result<Option<BetTicket>, StoreError> {
        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM bets
                 WHERE user_id = ?1 AND station_id = ?2 AND draw_date = ?3
                   AND bet_kind = ?4 AND number = ?5 AND status = 'PENDING'",
                params![
                    user_id,
                    key.station,
                    key.date.to_string(),
                    kind.to_string(),
                    number.to_string(),
                ],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => Ok(Some(Self::get(conn, id)?)),
            None => Ok(None),
        }
    }

    /// Insert a new PENDING ticket.
    ///
    /// A violation of the pending unique index maps to `DuplicateTicket`.
    pub fn create_pending(
        conn: &Connection,
        user_id: &str,
        key: &DrawKey,
        kind: BetKind,
        number: BetNumber,
        stake: Amount,
    ) -> Result<BetTicket, StoreError> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO bets
             (user_id, station_id, draw_date, bet_kind, number, stake, status, winnings, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'PENDING', '0', ?7)",
            params![
                user_id,
                key.station,
                key.date.to_string(),
                kind.to_string(),
                number.to_string(),
                stake.value().to_string(),
                now,
            ],
        )
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::DuplicateTicket {
                    user: user_id.to_string(),
                    station: key.station.clone(),
                    date: key.date,
                    kind: kind.to_string(),
                    number: number.to_string(),
                }
            } else {
                StoreError::Database(err)
            }
        })?;

        Self::get(conn, conn.last_insert_rowid())
    }

    /// Increase the stake of a PENDING ticket (conditional update).
    pub fn add_stake(
        conn: &Connection,
        ticket_id: i64,
        additional: Amount,
    ) -> Result<BetTicket, StoreError> {
        let current = Self::get(conn, ticket_id)?;
        if current.status != BetStatus::Pending {
            return Err(StoreError::InvalidTransition {
                ticket: ticket_id,
                status: current.status.to_string(),
            });
        }

        let new_stake = current
            .stake
            .checked_add(&additional)
            .ok_or_else(|| StoreError::Corrupt(format!("stake overflow on ticket {ticket_id}")))?;

        let rows = conn.execute(
            "UPDATE bets SET stake = ?1 WHERE id = ?2 AND status = 'PENDING'",
            params![new_stake.value().to_string(), ticket_id],
        )?;
        if rows == 0 {
            // Settled between the read and the update
            let latest = Self::get(conn, ticket_id)?;
            return Err(StoreError::InvalidTransition {
                ticket: ticket_id,
                status: latest.status.to_string(),
            });
        }

        Self::get(conn, ticket_id)
    }

    /// Find the user's PENDING ticket for the key tuple and add the stake
    /// to it, or create one.
    ///
    /// Returns the ticket and whether it was created. A `DuplicateTicket`
    /// race on insert is retried once as an update-into-existing before
    /// surfacing.
    pub fn find_or_create_pending(
        conn: &Connection,
        user_id: &str,
        key: &DrawKey,
        kind: BetKind,
        number: BetNumber,
        stake: Amount,
    ) -> Result<(BetTicket, bool), StoreError> {
        if let Some(existing) = Self::find_pending(conn, user_id, key, kind, number)? {
            let merged = Self::add_stake(conn, existing.id, stake)?;
            return Ok((merged, false));
        }

        match Self::create_pending(conn, user_id, key, kind, number, stake) {
            Ok(ticket) => Ok((ticket, true)),
            Err(StoreError::DuplicateTicket { .. }) => {
                match Self::find_pending(conn, user_id, key, kind, number)? {
                    Some(existing) => {
                        let merged = Self::add_stake(conn, existing.id, stake)?;
                        Ok((merged, false))
                    }
                    None => Err(StoreError::DuplicateTicket {
                        user: user_id.to_string(),
                        station: key.station.clone(),
                        date: key.date,
                        kind: kind.to_string(),
                        number: number.to_string(),
                    }),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Load a ticket by id
    pub fn get(conn: &Connection, ticket_id: i64) -> Result<BetTicket, StoreError> {
        let row = conn
            .query_row(
                "SELECT id, user_id, station_id, draw_date, bet_kind, number,
                        stake, status, winnings, created_at
                 FROM bets WHERE id = ?1",
                params![ticket_id],
                map_ticket_row,
            )
            .optional()?;

        match row {
            Some(raw) => ticket_from_raw(raw),
            None => Err(StoreError::not_found("BetTicket", ticket_id.to_string())),
        }
    }

    /// Load a ticket by id, verifying ownership
    pub fn get_for_user(
        conn: &Connection,
        ticket_id: i64,
        user_id: &str,
    ) -> Result<BetTicket, StoreError> {
        let ticket = Self::get(conn, ticket_id)?;
        if ticket.user_id != user_id {
            return Err(StoreError::not_found("BetTicket", ticket_id.to_string()));
        }
        Ok(ticket)
    }

    /// All PENDING tickets for one draw key, in creation order
    pub fn list_pending(conn: &Connection, key: &DrawKey) -> Result<Vec<BetTicket>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, station_id, draw_date, bet_kind, number,
                    stake, status, winnings, created_at
             FROM bets
             WHERE station_id = ?1 AND draw_date = ?2 AND status = 'PENDING'
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![key.station, key.date.to_string()], map_ticket_row)?;

        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(ticket_from_raw(row?)?);
        }
        Ok(tickets)
    }

    /// A user's tickets for one draw date (any station, any status),
    /// newest first
    pub fn list_for_user(
        conn: &Connection,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<BetTicket>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, station_id, draw_date, bet_kind, number,
                    stake, status, winnings, created_at
             FROM bets
             WHERE user_id = ?1 AND draw_date = ?2
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![user_id, date.to_string()], map_ticket_row)?;

        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(ticket_from_raw(row?)?);
        }
        Ok(tickets)
    }

    /// Transition a ticket out of PENDING, recording its winnings.
    ///
    /// Compare-and-swap: the update only applies while the ticket is
    /// still PENDING. A ticket that was already settled yields
    /// `InvalidTransition`; a missing ticket yields `NotFound`.
    pub fn transition(
        conn: &Connection,
        ticket_id: i64,
        new_status: BetStatus,
        winnings: Amount,
    ) -> Result<(), StoreError> {
        let rows = conn.execute(
            "UPDATE bets SET status = ?1, winnings = ?2
             WHERE id = ?3 AND status = 'PENDING'",
            params![new_status.to_string(), winnings.value().to_string(), ticket_id],
        )?;

        if rows == 0 {
            let current = Self::get(conn, ticket_id)?;
            return Err(StoreError::InvalidTransition {
                ticket: ticket_id,
                status: current.status.to_string(),
            });
        }
        Ok(())
    }

    /// Remove a PENDING ticket (conditional delete, used by bet deletion).
    ///
    /// Fails with `InvalidTransition` if the ticket is no longer PENDING.
    pub fn delete_pending(conn: &Connection, ticket_id: i64) -> Result<(), StoreError> {
        let rows = conn.execute(
            "DELETE FROM bets WHERE id = ?1 AND status = 'PENDING'",
            params![ticket_id],
        )?;

        if rows == 0 {
            let current = Self::get(conn, ticket_id)?;
            return Err(StoreError::InvalidTransition {
                ticket: ticket_id,
                status: current.status.to_string(),
            });
        }
        Ok(())
    }
}

type RawTicket = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

fn map_ticket_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTicket> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn ticket_from_raw(raw: RawTicket) -> Result<BetTicket, StoreError> {
    let (id, user_id, station_id, date, kind, number, stake, status, winnings, created_at) = raw;
    Ok(BetTicket {
        id,
        user_id,
        station_id,
        date: date
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("bad draw date {date:?}")))?,
        kind: kind
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("bad bet kind {kind:?}")))?,
        number: number
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("bad number {number:?}")))?,
        stake: parse_amount(&stake)?,
        status: status
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("bad status {status:?}")))?,
        winnings: parse_amount(&winnings)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StoreError::Corrupt(format!("bad timestamp {created_at:?}")))?,
    })
}

fn parse_amount(text: &str) -> Result<Amount, StoreError> {
    let value = Decimal::from_str(text)
        .map_err(|_| StoreError::Corrupt(format!("bad decimal {text:?}")))?;
    Amount::new(value).map_err(|_| StoreError::Corrupt(format!("negative amount {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        TicketRepo::init_schema(&conn).unwrap();
        conn
    }

    fn key() -> DrawKey {
        DrawKey::new("mien-bac", "2026-08-31".parse().unwrap())
    }

    fn stake(d: Decimal) -> Amount {
        Amount::new(d).unwrap()
    }

    fn place(conn: &Connection, number: &str) -> (BetTicket, bool) {
        TicketRepo::find_or_create_pending(
            conn,
            "alice",
            &key(),
            BetKind::De,
            number.parse().unwrap(),
            stake(dec!(10000)),
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let (ticket, created) = place(&conn, "45");
        assert!(created);
        assert_eq!(ticket.status, BetStatus::Pending);
        assert_eq!(ticket.stake.value(), dec!(10000));
        assert_eq!(TicketRepo::get(&conn, ticket.id).unwrap(), ticket);
    }

    #[test]
    fn test_merge_not_duplicate() {
        let conn = setup();
        let (first, created) = place(&conn, "45");
        assert!(created);

        let (merged, created) = place(&conn, "45");
        assert!(!created);
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.stake.value(), dec!(20000));

        let pending = TicketRepo::list_pending(&conn, &key()).unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_unique_index_blocks_raw_duplicate() {
        let conn = setup();
        place(&conn, "45");
        let err = TicketRepo::create_pending(
            &conn,
            "alice",
            &key(),
            BetKind::De,
            "45".parse().unwrap(),
            stake(dec!(5000)),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTicket { .. }));
    }

    #[test]
    fn test_same_number_different_kind_is_distinct() {
        let conn = setup();
        place(&conn, "45");
        let (ticket, created) = TicketRepo::find_or_create_pending(
            &conn,
            "alice",
            &key(),
            BetKind::Lo,
            "45".parse().unwrap(),
            stake(dec!(10000)),
        )
        .unwrap();
        assert!(created);
        assert_eq!(ticket.kind, BetKind::Lo);
        assert_eq!(TicketRepo::list_pending(&conn, &key()).unwrap().len(), 2);
    }

    #[test]
    fn test_transition_once_only() {
        let conn = setup();
        let (ticket, _) = place(&conn, "45");

        TicketRepo::transition(&conn, ticket.id, BetStatus::Won, stake(dec!(700000))).unwrap();
        let settled = TicketRepo::get(&conn, ticket.id).unwrap();
        assert_eq!(settled.status, BetStatus::Won);
        assert_eq!(settled.winnings.value(), dec!(700000));

        let err =
            TicketRepo::transition(&conn, ticket.id, BetStatus::Lost, Amount::ZERO).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_settled_ticket_frees_unique_slot() {
        let conn = setup();
        let (ticket, _) = place(&conn, "45");
        TicketRepo::transition(&conn, ticket.id, BetStatus::Lost, Amount::ZERO).unwrap();

        // A new PENDING ticket for the same tuple is allowed again
        let (fresh, created) = place(&conn, "45");
        assert!(created);
        assert_ne!(fresh.id, ticket.id);
    }

    #[test]
    fn test_delete_pending_only() {
        let conn = setup();
        let (ticket, _) = place(&conn, "45");
        TicketRepo::delete_pending(&conn, ticket.id).unwrap();
        assert!(matches!(
            TicketRepo::get(&conn, ticket.id).unwrap_err(),
            StoreError::NotFound { .. }
        ));

        let (other, _) = place(&conn, "46");
        TicketRepo::transition(&conn, other.id, BetStatus::Won, stake(dec!(1))).unwrap();
        let err = TicketRepo::delete_pending(&conn, other.id).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_get_for_user_hides_foreign_tickets() {
        let conn = setup();
        let (ticket, _) = place(&conn, "45");
        assert!(TicketRepo::get_for_user(&conn, ticket.id, "alice").is_ok());
        assert!(matches!(
            TicketRepo::get_for_user(&conn, ticket.id, "bob").unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_list_pending_skips_settled() {
        let conn = setup();
        let (a, _) = place(&conn, "45");
        place(&conn, "46");
        TicketRepo::transition(&conn, a.id, BetStatus::Lost, Amount::ZERO).unwrap();

        let pending = TicketRepo::list_pending(&conn, &key()).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].number.to_string(), "46");
    }
}
