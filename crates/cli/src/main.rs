//! LotoBank CLI - Lottery betting operations from command line
//!
//! Usage:
//! ```bash
//! lotobank init
//! lotobank station add tp-hcm "TP. HCM" --region south
//! lotobank deposit alice 500000
//! lotobank place alice tp-hcm --kind de --numbers 45,46 --stake 10000
//! lotobank publish-result tp-hcm --prizes 512345,10001,...
//! lotobank settle tp-hcm
//! lotobank wallet show alice
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use chrono::NaiveDate;
use lotobank_engine::Engine;
use lotobank_core::PayoutRates;
use lotobank_store::BetKind;
use rust_decimal::Decimal;
use std::path::PathBuf;

mod commands;

use commands::{bets, draws, stations, wallet};

/// LotoBank - Lottery bet placement and settlement over a money ledger
#[derive(Parser)]
#[command(name = "lotobank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/lotobank.db", global = true)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Station management
    Station {
        #[command(subcommand)]
        action: StationAction,
    },

    /// Deposit funds into a user's wallet
    Deposit {
        /// User ID
        user_id: String,
        /// Amount to deposit
        amount: Decimal,
        /// External payment reference (generated when omitted)
        #[arg(long)]
        reference: Option<String>,
    },

    /// Withdraw funds from a user's wallet
    Withdraw {
        /// User ID
        user_id: String,
        /// Amount to withdraw
        amount: Decimal,
    },

    /// Wallet inspection
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Place bets on a draw
    Place {
        /// User ID
        user_id: String,
        /// Station ID
        station_id: String,
        /// Bet kind
        #[arg(long)]
        kind: BetKindArg,
        /// Numbers to bet on (comma-separated, two digits each)
        #[arg(long, value_delimiter = ',')]
        numbers: Vec<String>,
        /// Stake per number
        #[arg(long)]
        stake: Decimal,
        /// Draw date (YYYY-MM-DD, defaults to the station's current betting date)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a pending bet and refund its stake
    DeleteBet {
        /// User ID
        user_id: String,
        /// Ticket ID
        ticket_id: i64,
    },

    /// List a user's tickets for a draw date
    Tickets {
        /// User ID
        user_id: String,
        /// Draw date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Publish the official result for a draw
    PublishResult {
        /// Station ID
        station_id: String,
        /// Prize values, first prize first (comma-separated)
        #[arg(long, value_delimiter = ',')]
        prizes: Vec<String>,
        /// Draw date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Settle all pending bets for a draw
    Settle {
        /// Station ID
        station_id: String,
        /// Draw date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum StationAction {
    /// Register or update a station
    Add {
        /// Station ID (e.g., tp-hcm)
        station_id: String,
        /// Display name
        name: String,
        /// Region
        #[arg(long)]
        region: RegionArg,
        /// Weekdays the station draws on ("ALL" or comma-separated 0..=6, 0 = Monday)
        #[arg(long)]
        days: Option<String>,
        /// Betting cutoff hour (local time)
        #[arg(long)]
        cutoff: Option<u32>,
    },
    /// List registered stations
    List,
}

#[derive(Subcommand)]
pub enum WalletAction {
    /// Show a user's balance
    Show {
        /// User ID
        user_id: String,
    },
    /// Show a user's ledger history
    History {
        /// User ID
        user_id: String,
    },
    /// Verify the ledger entries sum to the balance
    Audit {
        /// User ID
        user_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BetKindArg {
    De,
    Lo,
}

impl BetKindArg {
    pub fn to_core_kind(&self) -> BetKind {
        match self {
            BetKindArg::De => BetKind::De,
            BetKindArg::Lo => BetKind::Lo,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RegionArg {
    North,
    Central,
    South,
}

impl RegionArg {
    pub fn to_core_region(&self) -> lotobank_core::Region {
        match self {
            RegionArg::North => lotobank_core::Region::North,
            RegionArg::Central => lotobank_core::Region::Central,
            RegionArg::South => lotobank_core::Region::South,
        }
    }
}

fn open_engine(db: &PathBuf) -> Result<Engine> {
    if let Some(parent) = db.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    Ok(Engine::open(db, PayoutRates::default())?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let engine = open_engine(&cli.db)?;

    match cli.command {
        Commands::Init => {
            // Schema is created on open
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Station { action } => {
            stations::handle(&engine, action)?;
        }

        Commands::Deposit {
            user_id,
            amount,
            reference,
        } => {
            wallet::deposit(&engine, &user_id, amount, reference)?;
        }

        Commands::Withdraw { user_id, amount } => {
            wallet::withdraw(&engine, &user_id, amount)?;
        }

        Commands::Wallet { action } => {
            wallet::handle(&engine, action)?;
        }

        Commands::Place {
            user_id,
            station_id,
            kind,
            numbers,
            stake,
            date,
        } => {
            bets::place(&engine, &user_id, &station_id, kind, numbers, stake, date)?;
        }

        Commands::DeleteBet { user_id, ticket_id } => {
            bets::delete(&engine, &user_id, ticket_id)?;
        }

        Commands::Tickets { user_id, date } => {
            bets::list(&engine, &user_id, date)?;
        }

        Commands::PublishResult {
            station_id,
            prizes,
            date,
        } => {
            draws::publish(&engine, &station_id, prizes, date)?;
        }

        Commands::Settle { station_id, date } => {
            draws::settle(&engine, &station_id, date)?;
        }
    }

    Ok(())
}
