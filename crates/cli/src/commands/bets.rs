//! Bet placement, deletion and listing

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use lotobank_core::{Amount, BetNumber};
use lotobank_engine::{Engine, PlacementRequest};
use rust_decimal::Decimal;

use crate::BetKindArg;

/// Place one or more bets on a draw. When no date is given, the bet
/// targets the station's current betting date (tomorrow after cutoff).
pub fn place(
    engine: &Engine,
    user_id: &str,
    station_id: &str,
    kind: BetKindArg,
    numbers: Vec<String>,
    stake: Decimal,
    date: Option<NaiveDate>,
) -> Result<()> {
    if numbers.is_empty() {
        bail!("at least one number is required");
    }
    let numbers: Vec<BetNumber> = numbers
        .iter()
        .map(|n| n.parse().with_context(|| format!("invalid number {:?}", n)))
        .collect::<Result<_>>()?;
    let stake = Amount::new(stake).context("invalid stake")?;

    let now_local = Local::now().naive_local();
    let date = match date {
        Some(date) => date,
        None => engine.station(station_id)?.betting_date(now_local),
    };

    let summary = engine.place_bets(&PlacementRequest {
        user_id: user_id.to_string(),
        station_id: station_id.to_string(),
        date,
        kind: kind.to_core_kind(),
        numbers,
        stake_per_number: stake,
        now_local,
    })?;

    println!("✅ Bets placed for {}/{}", station_id, date);
    println!("   Created: {}", summary.created);
    println!("   Merged:  {}", summary.merged);
    println!("   Staked:  {}", summary.total_staked);
    println!("   Balance: {}", summary.new_balance);
    Ok(())
}

/// Delete a pending bet and refund the full stake
pub fn delete(engine: &Engine, user_id: &str, ticket_id: i64) -> Result<()> {
    let now_local = Local::now().naive_local();
    let refunded = engine.delete_bet(user_id, ticket_id, now_local)?;

    println!("✅ Bet {} deleted, refunded {}", ticket_id, refunded);
    Ok(())
}

/// List a user's tickets for one draw date
pub fn list(engine: &Engine, user_id: &str, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let tickets = engine.tickets_for(user_id, date)?;
    if tickets.is_empty() {
        println!("No tickets for {} on {}", user_id, date);
        return Ok(());
    }

    println!("🎫 Tickets for {} on {}", user_id, date);
    for ticket in tickets {
        println!(
            "   #{:<5} {:<8} {} {}  stake {:>10}  {:<8} winnings {}",
            ticket.id,
            ticket.station_id,
            ticket.kind,
            ticket.number,
            ticket.stake,
            ticket.status,
            ticket.winnings,
        );
    }
    Ok(())
}
