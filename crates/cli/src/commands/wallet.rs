//! Wallet operations: deposit, withdraw, balance, history

use anyhow::{Context, Result};
use lotobank_core::Amount;
use lotobank_engine::Engine;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::WalletAction;

/// Deposit funds into a user's wallet
pub fn deposit(
    engine: &Engine,
    user_id: &str,
    amount: Decimal,
    reference: Option<String>,
) -> Result<()> {
    let amount = Amount::new(amount).context("invalid deposit amount")?;
    let reference = reference.unwrap_or_else(|| format!("cli-{}", Uuid::new_v4()));
    let balance = engine.deposit(user_id, amount, Some(&reference))?;

    println!("✅ Deposit successful!");
    println!("   User:      {}", user_id);
    println!("   Amount:    {}", amount);
    println!("   Reference: {}", reference);
    println!("   Balance:   {}", balance);
    Ok(())
}

/// Withdraw funds from a user's wallet
pub fn withdraw(engine: &Engine, user_id: &str, amount: Decimal) -> Result<()> {
    let amount = Amount::new(amount).context("invalid withdrawal amount")?;
    let balance = engine.withdraw(user_id, amount)?;

    println!("✅ Withdrawal successful!");
    println!("   User:    {}", user_id);
    println!("   Amount:  {}", amount);
    println!("   Balance: {}", balance);
    Ok(())
}

pub fn handle(engine: &Engine, action: WalletAction) -> Result<()> {
    match action {
        WalletAction::Show { user_id } => {
            let balance = engine.balance(&user_id)?;
            println!("💰 {}: {}", user_id, balance);
        }
        WalletAction::History { user_id } => {
            let entries = engine.history(&user_id)?;
            if entries.is_empty() {
                println!("No ledger entries for {}", user_id);
                return Ok(());
            }
            println!("📒 Ledger for {} ({} entries)", user_id, entries.len());
            for entry in entries {
                println!(
                    "   #{:<5} {:>12} {:<8} {}  {}",
                    entry.id,
                    entry.delta,
                    entry.kind,
                    entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.description,
                );
            }
        }
        WalletAction::Audit { user_id } => {
            let balance = engine.audit(&user_id)?;
            println!("✅ Ledger consistent for {} (balance {})", user_id, balance);
        }
    }
    Ok(())
}
