//! Draw results and their derived fields
//!
//! A result's special number and appearance multiset are pure functions
//! of the prize list. The only way to obtain a [`DrawResult`] is the
//! deriving constructor, so the derived fields can never drift from the
//! prizes they were computed from. Published results are immutable:
//! re-publication for the same draw key is rejected.

use crate::error::{is_unique_violation, StoreError};
use chrono::NaiveDate;
use lotobank_core::{BetNumber, DrawKey};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

/// One published draw result.
///
/// Fields are private and the struct has no `Deserialize` impl: the
/// special number and appearance multiset can only be computed from the
/// prize list by [`DrawResult::derive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    key: DrawKey,
    prizes: Vec<String>,
    special_number: BetNumber,
    appearance: Vec<BetNumber>,
}

impl DrawResult {
    /// Derive a result from an ordered prize list.
    ///
    /// The special number is the last two digits of the first prize; the
    /// appearance multiset is the last two digits of every prize, in
    /// prize order. `expected_count` is the station's configured prize
    /// count and must match exactly.
    pub fn derive(
        key: DrawKey,
        prizes: Vec<String>,
        expected_count: usize,
    ) -> Result<Self, StoreError> {
        if prizes.len() != expected_count || prizes.is_empty() {
            return Err(StoreError::InvalidPrizeCount {
                station: key.station,
                expected: expected_count,
                actual: prizes.len(),
            });
        }

        let mut appearance = Vec::with_capacity(prizes.len());
        for (index, prize) in prizes.iter().enumerate() {
            let number = BetNumber::from_prize(prize).map_err(|_| StoreError::InvalidPrize {
                index,
                value: prize.clone(),
            })?;
            appearance.push(number);
        }
        // Prize lists are non-empty for every configured station, and the
        // first prize is always index 0.
        let special_number = appearance[0];

        Ok(Self {
            key,
            prizes,
            special_number,
            appearance,
        })
    }

    pub fn key(&self) -> &DrawKey {
        &self.key
    }

    pub fn prizes(&self) -> &[String] {
        &self.prizes
    }

    /// Last two digits of the first prize
    pub fn special_number(&self) -> BetNumber {
        self.special_number
    }

    /// Last two digits of every prize, in prize order (a multiset)
    pub fn appearance(&self) -> &[BetNumber] {
        &self.appearance
    }

    /// How many times a number appears across all prizes
    pub fn hits(&self, number: BetNumber) -> u32 {
        self.appearance.iter().filter(|n| **n == number).count() as u32
    }
}

/// SQLite repository for published draw results
pub struct ResultRepo;

impl ResultRepo {
    /// Create the results table if it does not exist
    pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS draw_results (
                station_id      TEXT NOT NULL,
                draw_date       TEXT NOT NULL,
                prizes          TEXT NOT NULL,
                special_number  TEXT NOT NULL,
                appearance      TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                PRIMARY KEY (station_id, draw_date)
            );",
        )?;
        Ok(())
    }

    /// Publish a derived result. Fails with `DuplicateResult` if a result
    /// for the same draw key already exists.
    pub fn put(conn: &Connection, result: &DrawResult) -> Result<(), StoreError> {
        let prizes = serde_json::to_string(result.prizes())?;
        let appearance = serde_json::to_string(result.appearance())?;
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO draw_results
             (station_id, draw_date, prizes, special_number, appearance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                result.key().station,
                result.key().date.to_string(),
                prizes,
                result.special_number().to_string(),
                appearance,
                now,
            ],
        )
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::DuplicateResult {
                    station: result.key().station.clone(),
                    date: result.key().date,
                }
            } else {
                StoreError::Database(err)
            }
        })?;
        Ok(())
    }

    /// Load the published result for a draw key
    pub fn get(conn: &Connection, key: &DrawKey) -> Result<DrawResult, StoreError> {
        let row: Option<(String, String, String)> = conn
            .query_row(
                "SELECT prizes, special_number, appearance
                 FROM draw_results WHERE station_id = ?1 AND draw_date = ?2",
                params![key.station, key.date.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let (prizes, special_number, appearance) = match row {
            Some(row) => row,
            None => return Err(StoreError::not_found("DrawResult", key.to_string())),
        };

        let prizes: Vec<String> = serde_json::from_str(&prizes)?;
        let appearance: Vec<BetNumber> = serde_json::from_str(&appearance)?;
        let special_number: BetNumber = special_number
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("bad special number {special_number:?}")))?;

        Ok(DrawResult {
            key: key.clone(),
            prizes,
            special_number,
            appearance,
        })
    }

    /// Does a result exist for the given draw key?
    pub fn exists(conn: &Connection, key: &DrawKey) -> Result<bool, StoreError> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM draw_results WHERE station_id = ?1 AND draw_date = ?2",
            params![key.station, key.date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Draw dates with a published result for a station, newest first
    pub fn dates_for(conn: &Connection, station_id: &str) -> Result<Vec<NaiveDate>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT draw_date FROM draw_results WHERE station_id = ?1 ORDER BY draw_date DESC",
        )?;
        let rows = stmt.query_map(params![station_id], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for row in rows {
            let raw = row?;
            let date = raw
                .parse()
                .map_err(|_| StoreError::Corrupt(format!("bad draw date {raw:?}")))?;
            dates.push(date);
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> DrawKey {
        DrawKey::new("tp-hcm", "2026-08-31".parse().unwrap())
    }

    fn prizes_18(first: &str) -> Vec<String> {
        let mut prizes = vec![first.to_string()];
        for i in 1..18 {
            prizes.push(format!("{:05}", i * 137));
        }
        prizes
    }

    #[test]
    fn test_derive_special_number() {
        let result = DrawResult::derive(key(), prizes_18("512345"), 18).unwrap();
        assert_eq!(result.special_number().to_string(), "45");
        assert_eq!(result.appearance().len(), 18);
    }

    #[test]
    fn test_derive_wrong_count() {
        let err = DrawResult::derive(key(), prizes_18("512345")[..17].to_vec(), 18).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidPrizeCount { expected: 18, actual: 17, .. }
        ));
    }

    #[test]
    fn test_derive_bad_prize() {
        let mut prizes = prizes_18("512345");
        prizes[3] = "x".to_string();
        let err = DrawResult::derive(key(), prizes, 18).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPrize { index: 3, .. }));
    }

    #[test]
    fn test_hits_counts_multiset() {
        let mut prizes = prizes_18("512345");
        prizes[5] = "00045".to_string();
        prizes[9] = "71145".to_string();
        let result = DrawResult::derive(key(), prizes, 18).unwrap();
        assert_eq!(result.hits("45".parse().unwrap()), 3);
        assert_eq!(result.hits("99".parse().unwrap()), 0);
    }

    #[test]
    fn test_put_get_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        ResultRepo::init_schema(&conn).unwrap();

        let result = DrawResult::derive(key(), prizes_18("512345"), 18).unwrap();
        ResultRepo::put(&conn, &result).unwrap();

        let loaded = ResultRepo::get(&conn, &key()).unwrap();
        assert_eq!(loaded, result);
        assert!(ResultRepo::exists(&conn, &key()).unwrap());
    }

    #[test]
    fn test_put_duplicate_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        ResultRepo::init_schema(&conn).unwrap();

        let result = DrawResult::derive(key(), prizes_18("512345"), 18).unwrap();
        ResultRepo::put(&conn, &result).unwrap();

        let republished = DrawResult::derive(key(), prizes_18("999999"), 18).unwrap();
        let err = ResultRepo::put(&conn, &republished).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateResult { .. }));

        // Original result untouched
        let loaded = ResultRepo::get(&conn, &key()).unwrap();
        assert_eq!(loaded.special_number().to_string(), "45");
    }

    #[test]
    fn test_get_missing() {
        let conn = Connection::open_in_memory().unwrap();
        ResultRepo::init_schema(&conn).unwrap();
        let err = ResultRepo::get(&conn, &key()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "DrawResult", .. }));
    }
}
