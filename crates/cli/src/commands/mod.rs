pub mod bets;
pub mod draws;
pub mod stations;
pub mod wallet;
