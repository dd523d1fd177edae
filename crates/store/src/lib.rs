//! LotoBank Store - Bet tickets, draw results and the station registry
//!
//! Persistence for everything settlement reads and writes besides money:
//! - `StationRepo`: registered draw channels
//! - `DrawResult` / `ResultRepo`: published results, immutable per draw
//!   key, with derived fields computed only by the pure constructor
//! - `BetTicket` / `TicketRepo`: ticket lifecycle (PENDING -> WON/LOST)
//!   with a real uniqueness guarantee on pending tickets and
//!   compare-and-swap status transitions

pub mod error;
pub mod results;
pub mod stations;
pub mod tickets;

pub use error::StoreError;
pub use results::{DrawResult, ResultRepo};
pub use stations::StationRepo;
pub use tickets::{BetKind, BetStatus, BetTicket, TicketRepo};
