//! LotoBank Ledger - The only sanctioned way to move money
//!
//! Every balance change goes through [`WalletRepo::apply_effects`], which
//! records one immutable [`LedgerEntry`] per effect in the same unit of
//! work as the balance update. The entry trail is the source of truth;
//! the wallet balance is a materialized cache of it, and
//! [`WalletRepo::audit`] re-derives one from the other.
//!
//! # Key Types
//! - `EntryKind`: DEPOSIT / WITHDRAW / BET / WIN / REFUND
//! - `LedgerEffect`: one signed balance delta to apply
//! - `LedgerEntry`: one recorded, immutable balance change
//! - `WalletRepo`: SQLite operations over wallets + ledger_entries

pub mod entry;
pub mod error;
pub mod repo;

pub use entry::{EntryKind, LedgerEffect, LedgerEntry};
pub use error::LedgerError;
pub use repo::WalletRepo;
