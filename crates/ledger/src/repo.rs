//! SQLite operations over wallets and ledger entries
//!
//! All functions take a `&Connection` and also accept a
//! `rusqlite::Transaction` through deref. Multi-effect application is NOT
//! self-transactional: the caller owns the unit of work and must wrap
//! [`WalletRepo::apply_effects`] in its transaction together with any
//! other state it mutates (ticket transitions, deletions).

use crate::entry::{EntryKind, LedgerEffect, LedgerEntry};
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;

/// SQLite repository for wallets + ledger entries
pub struct WalletRepo;

impl WalletRepo {
    /// Create the wallet tables if they do not exist
    pub fn init_schema(conn: &Connection) -> Result<(), LedgerError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wallets (
                user_id    TEXT PRIMARY KEY,
                balance    TEXT NOT NULL DEFAULT '0',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ledger_entries (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     TEXT NOT NULL REFERENCES wallets(user_id),
                delta       TEXT NOT NULL,
                kind        TEXT NOT NULL,
                description TEXT NOT NULL,
                external_id TEXT,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ledger_entries_user
                ON ledger_entries(user_id);",
        )?;
        Ok(())
    }

    /// Open a wallet for the user with a zero balance. Idempotent.
    pub fn open(conn: &Connection, user_id: &str) -> Result<(), LedgerError> {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO wallets (user_id, balance, created_at, updated_at)
             VALUES (?1, '0', ?2, ?2)",
            params![user_id, now],
        )?;
        Ok(())
    }

    /// Current balance of a wallet
    pub fn balance(conn: &Connection, user_id: &str) -> Result<Decimal, LedgerError> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT balance FROM wallets WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => parse_decimal(&text),
            None => Err(LedgerError::WalletNotFound(user_id.to_string())),
        }
    }

    /// Apply a batch of effects to one wallet.
    ///
    /// Records one ledger entry per effect and updates the materialized
    /// balance once. The running balance is checked after every effect;
    /// if any debit would drive it negative, nothing has been committed
    /// as long as the caller's transaction rolls back.
    ///
    /// Returns the new balance.
    pub fn apply_effects(
        conn: &Connection,
        user_id: &str,
        effects: &[LedgerEffect],
    ) -> Result<Decimal, LedgerError> {
        let mut balance = Self::balance(conn, user_id)?;
        let now = Utc::now().to_rfc3339();

        let mut insert = conn.prepare(
            "INSERT INTO ledger_entries (user_id, delta, kind, description, external_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for effect in effects {
            let next = balance
                .checked_add(effect.delta)
                .ok_or(LedgerError::Overflow(effect.delta))?;
            if next < Decimal::ZERO {
                return Err(LedgerError::InsufficientFunds {
                    needed: effect.delta.abs(),
                    available: balance,
                });
            }
            balance = next;

            insert.execute(params![
                user_id,
                effect.delta.to_string(),
                effect.kind.to_string(),
                effect.description,
                effect.external_id,
                now,
            ])?;
        }

        conn.execute(
            "UPDATE wallets SET balance = ?1, updated_at = ?2 WHERE user_id = ?3",
            params![balance.to_string(), now, user_id],
        )?;

        Ok(balance)
    }

    /// Entry history for a wallet, newest first
    pub fn entries(conn: &Connection, user_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, delta, kind, description, external_id, created_at
             FROM ledger_entries WHERE user_id = ?1 ORDER BY id DESC",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, user_id, delta, kind, description, external_id, created_at) = row?;
            entries.push(LedgerEntry {
                id,
                user_id,
                delta: parse_decimal(&delta)?,
                kind: parse_kind(&kind)?,
                description,
                external_id,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(entries)
    }

    /// Verify the ledger invariant for one wallet: the balance must equal
    /// the sum of all entry deltas. Returns the balance on success.
    pub fn audit(conn: &Connection, user_id: &str) -> Result<Decimal, LedgerError> {
        let balance = Self::balance(conn, user_id)?;

        let mut stmt =
            conn.prepare("SELECT delta FROM ledger_entries WHERE user_id = ?1 ORDER BY id")?;
        let deltas = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

        let mut entry_sum = Decimal::ZERO;
        for delta in deltas {
            entry_sum += parse_decimal(&delta?)?;
        }

        if entry_sum != balance {
            return Err(LedgerError::BalanceMismatch {
                user: user_id.to_string(),
                balance,
                entry_sum,
            });
        }
        Ok(balance)
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(text).map_err(|_| LedgerError::Corrupt(format!("bad decimal {text:?}")))
}

fn parse_kind(text: &str) -> Result<EntryKind, LedgerError> {
    text.parse()
        .map_err(|_| LedgerError::Corrupt(format!("bad entry kind {text:?}")))
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, LedgerError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| LedgerError::Corrupt(format!("bad timestamp {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotobank_core::Amount;
    use rust_decimal_macros::dec;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        WalletRepo::init_schema(&conn).unwrap();
        WalletRepo::open(&conn, "alice").unwrap();
        conn
    }

    fn amount(d: Decimal) -> Amount {
        Amount::new(d).unwrap()
    }

    #[test]
    fn test_open_is_idempotent() {
        let conn = setup();
        WalletRepo::open(&conn, "alice").unwrap();
        assert_eq!(WalletRepo::balance(&conn, "alice").unwrap(), dec!(0));
    }

    #[test]
    fn test_missing_wallet() {
        let conn = setup();
        let err = WalletRepo::balance(&conn, "nobody").unwrap_err();
        assert!(matches!(err, LedgerError::WalletNotFound(_)));
    }

    #[test]
    fn test_credit_then_debit() {
        let conn = setup();
        let balance = WalletRepo::apply_effects(
            &conn,
            "alice",
            &[LedgerEffect::credit(
                amount(dec!(50000)),
                EntryKind::Deposit,
                "top-up",
            )],
        )
        .unwrap();
        assert_eq!(balance, dec!(50000));

        let balance = WalletRepo::apply_effects(
            &conn,
            "alice",
            &[LedgerEffect::debit(
                amount(dec!(20000)),
                EntryKind::Bet,
                "staked",
            )],
        )
        .unwrap();
        assert_eq!(balance, dec!(30000));
    }

    #[test]
    fn test_insufficient_funds() {
        let conn = setup();
        WalletRepo::apply_effects(
            &conn,
            "alice",
            &[LedgerEffect::credit(
                amount(dec!(1000)),
                EntryKind::Deposit,
                "top-up",
            )],
        )
        .unwrap();

        let err = WalletRepo::apply_effects(
            &conn,
            "alice",
            &[LedgerEffect::debit(
                amount(dec!(5000)),
                EntryKind::Bet,
                "staked",
            )],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                needed,
                available,
            } if needed == dec!(5000) && available == dec!(1000)
        ));
    }

    #[test]
    fn test_running_balance_checked_per_effect() {
        let conn = setup();
        WalletRepo::apply_effects(
            &conn,
            "alice",
            &[LedgerEffect::credit(
                amount(dec!(1000)),
                EntryKind::Deposit,
                "top-up",
            )],
        )
        .unwrap();

        // Second debit overdraws even though a later credit would cover it
        let err = WalletRepo::apply_effects(
            &conn,
            "alice",
            &[
                LedgerEffect::debit(amount(dec!(800)), EntryKind::Bet, "bet 1"),
                LedgerEffect::debit(amount(dec!(800)), EntryKind::Bet, "bet 2"),
                LedgerEffect::credit(amount(dec!(10000)), EntryKind::Win, "won"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_entries_newest_first() {
        let conn = setup();
        for (i, delta) in [dec!(100), dec!(200), dec!(300)].iter().enumerate() {
            WalletRepo::apply_effects(
                &conn,
                "alice",
                &[LedgerEffect::credit(
                    amount(*delta),
                    EntryKind::Deposit,
                    format!("deposit {i}"),
                )],
            )
            .unwrap();
        }

        let entries = WalletRepo::entries(&conn, "alice").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].delta, dec!(300));
        assert_eq!(entries[2].delta, dec!(100));
    }

    #[test]
    fn test_audit_matches_after_mixed_effects() {
        let conn = setup();
        WalletRepo::apply_effects(
            &conn,
            "alice",
            &[
                LedgerEffect::credit(amount(dec!(50000)), EntryKind::Deposit, "top-up"),
                LedgerEffect::debit(amount(dec!(10000)), EntryKind::Bet, "staked"),
                LedgerEffect::credit(amount(dec!(700.50)), EntryKind::Win, "won"),
            ],
        )
        .unwrap();

        let balance = WalletRepo::audit(&conn, "alice").unwrap();
        assert_eq!(balance, dec!(40700.50));
    }

    #[test]
    fn test_audit_detects_tampered_balance() {
        let conn = setup();
        WalletRepo::apply_effects(
            &conn,
            "alice",
            &[LedgerEffect::credit(
                amount(dec!(1000)),
                EntryKind::Deposit,
                "top-up",
            )],
        )
        .unwrap();

        // Direct mutation bypassing the ledger
        conn.execute(
            "UPDATE wallets SET balance = '9999' WHERE user_id = 'alice'",
            [],
        )
        .unwrap();

        let err = WalletRepo::audit(&conn, "alice").unwrap_err();
        assert!(matches!(err, LedgerError::BalanceMismatch { .. }));
    }
}
