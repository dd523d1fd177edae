//! DrawKey - Identifier of one published draw
//!
//! A draw is identified by (station, date). Exactly one result may be
//! published per key, and settlement is triggered per key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key of one draw: station identifier + draw date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawKey {
    /// Station slug, e.g. "mien-bac"
    pub station: String,
    /// Draw date
    pub date: NaiveDate,
}

impl DrawKey {
    /// Create a new draw key
    pub fn new(station: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            station: station.into(),
            date,
        }
    }
}

impl fmt::Display for DrawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.station, self.date)
    }
}
