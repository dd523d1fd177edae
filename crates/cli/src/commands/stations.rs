//! Station registry commands

use anyhow::Result;
use lotobank_core::Station;
use lotobank_engine::Engine;

use crate::StationAction;

pub fn handle(engine: &Engine, action: StationAction) -> Result<()> {
    match action {
        StationAction::Add {
            station_id,
            name,
            region,
            days,
            cutoff,
        } => {
            let mut station = Station::new(&station_id, &name, region.to_core_region());
            if let Some(days) = days {
                station = station.with_schedule(days.parse()?);
            }
            if let Some(cutoff) = cutoff {
                station = station.with_cutoff_hour(cutoff)?;
            }
            engine.register_station(&station)?;
            println!("✅ Station {} registered ({})", station_id, name);
        }
        StationAction::List => {
            let stations = engine.stations()?;
            if stations.is_empty() {
                println!("No stations registered");
                return Ok(());
            }
            println!("📍 Stations ({})", stations.len());
            for station in stations {
                println!(
                    "   {:<12} {:<16} {:<8} prizes {:>2}  cutoff {:02}:00  days {}",
                    station.identifier,
                    station.name,
                    station.region,
                    station.prize_count,
                    station.cutoff_hour,
                    station.schedule_days,
                );
            }
        }
    }
    Ok(())
}
