//! Result publication and settlement

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use lotobank_core::DrawKey;
use lotobank_engine::Engine;

/// Publish the official prize list for a draw. The special number is
/// derived from the first prize and the result becomes immutable.
pub fn publish(
    engine: &Engine,
    station_id: &str,
    prizes: Vec<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    if prizes.is_empty() {
        bail!("at least one prize is required");
    }
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let key = DrawKey::new(station_id, date);
    let result = engine.publish_result(&key, prizes)?;

    println!("✅ Result published for {}", key);
    println!("   Prizes:  {}", result.prizes().len());
    println!("   Special: {}", result.special_number());
    Ok(())
}

/// Settle every pending bet for a draw against its published result
pub fn settle(engine: &Engine, station_id: &str, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let key = DrawKey::new(station_id, date);
    let summary = engine.settle(&key)?;

    println!("✅ Settled {}", key);
    println!("   Won:      {}", summary.won);
    println!("   Lost:     {}", summary.lost);
    println!("   Paid out: {}", summary.paid_out);
    Ok(())
}
