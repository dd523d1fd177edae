//! Station registry persistence

use crate::error::StoreError;
use lotobank_core::Station;
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite repository for the station registry
pub struct StationRepo;

impl StationRepo {
    /// Create the stations table if it does not exist
    pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS stations (
                identifier    TEXT PRIMARY KEY,
                name          TEXT NOT NULL UNIQUE,
                region        TEXT NOT NULL,
                prize_count   INTEGER NOT NULL,
                cutoff_hour   INTEGER NOT NULL,
                schedule_days TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Insert or replace a station's configuration
    pub fn upsert(conn: &Connection, station: &Station) -> Result<(), StoreError> {
        conn.execute(
            "INSERT OR REPLACE INTO stations
             (identifier, name, region, prize_count, cutoff_hour, schedule_days)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                station.identifier,
                station.name,
                station.region.to_string(),
                station.prize_count as i64,
                station.cutoff_hour as i64,
                station.schedule_days.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Look up a station by identifier
    pub fn get(conn: &Connection, identifier: &str) -> Result<Station, StoreError> {
        let row = conn
            .query_row(
                "SELECT identifier, name, region, prize_count, cutoff_hour, schedule_days
                 FROM stations WHERE identifier = ?1",
                params![identifier],
                map_station_row,
            )
            .optional()?;

        match row {
            Some(raw) => station_from_raw(raw),
            None => Err(StoreError::not_found("Station", identifier)),
        }
    }

    /// All registered stations, ordered by identifier
    pub fn list(conn: &Connection) -> Result<Vec<Station>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT identifier, name, region, prize_count, cutoff_hour, schedule_days
             FROM stations ORDER BY identifier",
        )?;
        let rows = stmt.query_map([], map_station_row)?;

        let mut stations = Vec::new();
        for row in rows {
            stations.push(station_from_raw(row?)?);
        }
        Ok(stations)
    }
}

type RawStation = (String, String, String, i64, i64, String);

fn map_station_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStation> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn station_from_raw(raw: RawStation) -> Result<Station, StoreError> {
    let (identifier, name, region, prize_count, cutoff_hour, schedule_days) = raw;
    let region = region
        .parse()
        .map_err(|_| StoreError::Corrupt(format!("bad region {region:?}")))?;
    let schedule_days = schedule_days
        .parse()
        .map_err(|_| StoreError::Corrupt(format!("bad schedule days {schedule_days:?}")))?;
    Ok(Station {
        identifier,
        name,
        region,
        prize_count: prize_count as usize,
        cutoff_hour: cutoff_hour as u32,
        schedule_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotobank_core::{Region, ScheduleDays};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        StationRepo::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_upsert_and_get() {
        let conn = setup();
        let station = Station::new("mien-bac", "Miền Bắc", Region::North);
        StationRepo::upsert(&conn, &station).unwrap();

        let loaded = StationRepo::get(&conn, "mien-bac").unwrap();
        assert_eq!(loaded, station);
        assert_eq!(loaded.prize_count, 27);
    }

    #[test]
    fn test_get_missing() {
        let conn = setup();
        let err = StationRepo::get(&conn, "nope").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Station", .. }));
    }

    #[test]
    fn test_upsert_replaces_config() {
        let conn = setup();
        let station = Station::new("long-an", "Long An", Region::South);
        StationRepo::upsert(&conn, &station).unwrap();

        let updated = station.with_schedule(ScheduleDays::Days(vec![5]));
        StationRepo::upsert(&conn, &updated).unwrap();

        let loaded = StationRepo::get(&conn, "long-an").unwrap();
        assert_eq!(loaded.schedule_days, ScheduleDays::Days(vec![5]));
        assert_eq!(StationRepo::list(&conn).unwrap().len(), 1);
    }
}
