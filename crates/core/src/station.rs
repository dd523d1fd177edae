//! Station - Draw channel configuration
//!
//! A station is one lottery channel (e.g. "mien-bac", "tp-hcm"). It fixes
//! how many prizes a published result carries, the daily betting cutoff
//! hour, and which weekdays it draws on. Scheduling eligibility is a pure
//! function of the station and an explicit local time - nothing in this
//! module reads the wall clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Errors that can occur when parsing station configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    #[error("Invalid schedule days: {0:?} (expected \"ALL\" or comma-separated 0..=6)")]
    InvalidScheduleDays(String),

    #[error("Invalid cutoff hour: {0} (expected 0..=23)")]
    InvalidCutoffHour(u32),
}

/// Geographic region of a station.
///
/// Northern stations publish 27 prizes per draw, southern and central
/// stations 18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    North,
    South,
    Central,
}

impl Region {
    /// Number of prizes a result for this region carries
    pub fn default_prize_count(&self) -> usize {
        match self {
            Region::North => 27,
            Region::South | Region::Central => 18,
        }
    }
}

/// Which weekdays a station draws on.
///
/// Serialized as `"ALL"` or comma-separated weekday indices with
/// 0 = Monday .. 6 = Sunday, e.g. `"0,3,5"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScheduleDays {
    /// Draws every day
    All,
    /// Draws only on the listed weekdays (0 = Monday .. 6 = Sunday)
    Days(Vec<u8>),
}

impl ScheduleDays {
    /// Does the station draw on the given date?
    pub fn includes(&self, date: NaiveDate) -> bool {
        match self {
            ScheduleDays::All => true,
            ScheduleDays::Days(days) => {
                let weekday = date.weekday().num_days_from_monday() as u8;
                days.contains(&weekday)
            }
        }
    }
}

impl fmt::Display for ScheduleDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDays::All => write!(f, "ALL"),
            ScheduleDays::Days(days) => {
                let parts: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

impl FromStr for ScheduleDays {
    type Err = StationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ALL") {
            return Ok(ScheduleDays::All);
        }
        let mut days = Vec::new();
        for part in s.split(',') {
            let day: u8 = part
                .trim()
                .parse()
                .map_err(|_| StationError::InvalidScheduleDays(s.to_string()))?;
            if day > 6 {
                return Err(StationError::InvalidScheduleDays(s.to_string()));
            }
            if !days.contains(&day) {
                days.push(day);
            }
        }
        if days.is_empty() {
            return Err(StationError::InvalidScheduleDays(s.to_string()));
        }
        days.sort_unstable();
        Ok(ScheduleDays::Days(days))
    }
}

impl TryFrom<String> for ScheduleDays {
    type Error = StationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScheduleDays> for String {
    fn from(days: ScheduleDays) -> Self {
        days.to_string()
    }
}

/// One draw channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Slug identifier, e.g. "mien-bac", "tp-hcm", "long-an"
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Region, which also fixes the default prize count
    pub region: Region,
    /// Prizes per published result (North = 27, South/Central = 18)
    pub prize_count: usize,
    /// Hour of day after which bets for today's draw are closed
    pub cutoff_hour: u32,
    /// Weekdays this station draws on
    pub schedule_days: ScheduleDays,
}

impl Station {
    /// Default betting cutoff hour (18:00 local) for every region
    pub const DEFAULT_CUTOFF_HOUR: u32 = 18;

    /// Create a station with region defaults (prize count, 18:00 cutoff,
    /// draws every day).
    pub fn new(identifier: impl Into<String>, name: impl Into<String>, region: Region) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            region,
            prize_count: region.default_prize_count(),
            cutoff_hour: Self::DEFAULT_CUTOFF_HOUR,
            schedule_days: ScheduleDays::All,
        }
    }

    /// Override the drawing schedule
    pub fn with_schedule(mut self, schedule_days: ScheduleDays) -> Self {
        self.schedule_days = schedule_days;
        self
    }

    /// Override the cutoff hour. Rejects hours outside 0..=23.
    pub fn with_cutoff_hour(mut self, cutoff_hour: u32) -> Result<Self, StationError> {
        if cutoff_hour > 23 {
            return Err(StationError::InvalidCutoffHour(cutoff_hour));
        }
        self.cutoff_hour = cutoff_hour;
        Ok(self)
    }

    /// Has local time passed today's betting cutoff?
    pub fn is_after_cutoff(&self, now_local: NaiveDateTime) -> bool {
        now_local.hour() >= self.cutoff_hour
    }

    /// The draw date a bet placed now targets: today before the cutoff,
    /// tomorrow after it.
    pub fn betting_date(&self, now_local: NaiveDateTime) -> NaiveDate {
        if self.is_after_cutoff(now_local) {
            now_local.date() + chrono::Duration::days(1)
        } else {
            now_local.date()
        }
    }

    /// Is the given draw date still open for placing or deleting bets
    /// at the given local time?
    ///
    /// Open means: the station draws on that weekday, and the date is in
    /// the future or is today before the cutoff hour.
    pub fn is_open_at(&self, date: NaiveDate, now_local: NaiveDateTime) -> bool {
        if !self.schedule_days.includes(date) {
            return false;
        }
        let today = now_local.date();
        if date > today {
            return true;
        }
        date == today && !self.is_after_cutoff(now_local)
    }
}
