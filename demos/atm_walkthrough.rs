//! ATM Walkthrough
//!
//! This example walks one customer through a full session against the
//! in-memory bank and mock hardware.
//!
//! Key concepts:
//! - Operations are only legal from certain phases
//! - Insufficient funds is an outcome, not an error
//! - A jammed dispenser reverses the debit
//! - Structured logs via `tracing` (set RUST_LOG=debug for more)
//!
//! Run with: cargo run --example atm_walkthrough

use atm_session::services::{InMemoryBank, MockHardware};
use atm_session::{AccountId, ControllerBuilder, Money, SessionError, WithdrawalOutcome};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== ATM Walkthrough ===\n");

    let bank = Arc::new(InMemoryBank::sample());
    let mut atm = ControllerBuilder::new()
        .bank(Arc::clone(&bank))
        .hardware(MockHardware::new().with_denominations(vec![Money::from_minor(20), Money::from_minor(50)]))
        .withdrawal_limit(Money::from_minor(500))
        .build()?;

    println!("1. Inserting card...");
    atm.insert_card("1234567890")?;

    println!("2. Entering a wrong PIN, then the right one...");
    match atm.enter_pin("9999") {
        Err(SessionError::InvalidPin { attempts_remaining }) => {
            println!("   ✗ Incorrect PIN, {attempts_remaining} attempts left")
        }
        other => println!("   unexpected: {other:?}"),
    }
    atm.enter_pin("1234")?;
    println!("   ✓ PIN verified");

    println!("3. Available accounts:");
    for (i, account) in atm.get_available_accounts()?.iter().enumerate() {
        println!("   {}. {} ({})", i + 1, account.label, account.id);
    }

    println!("4. Selecting Checking account...");
    atm.select_account("1001")?;
    println!("   ✓ Balance: {}", atm.check_balance()?);

    println!("5. Withdrawing 100...");
    if let WithdrawalOutcome::Dispensed { balance } = atm.withdraw(Money::from_minor(100))? {
        println!("   ✓ New balance: {balance}");
    }

    println!("6. Withdrawing 30 (not dispensable from 20s and 50s)...");
    if let Err(err) = atm.withdraw(Money::from_minor(30)) {
        println!("   ✗ {err}");
    }

    println!("7. Withdrawing 400 with a jammed dispenser...");
    atm.hardware_mut().jam_dispenser = true;
    if let Err(err) = atm.withdraw(Money::from_minor(400)) {
        println!("   ✗ {err}");
    }
    atm.hardware_mut().jam_dispenser = false;
    if let Some(balance) = bank.balance_of(&AccountId::from("1001")) {
        println!("   Balance is still {balance}");
    }

    println!("8. Withdrawing 500 twice...");
    for _ in 0..2 {
        match atm.withdraw(Money::from_minor(500))? {
            WithdrawalOutcome::Dispensed { balance } => println!("   ✓ New balance: {balance}"),
            WithdrawalOutcome::InsufficientFunds { balance } => {
                println!("   ✗ Insufficient funds, balance {balance}")
            }
        }
    }

    println!("9. Depositing 50...");
    println!("   ✓ New balance: {}", atm.deposit(Money::from_minor(50))?);

    println!("10. Ejecting card...");
    atm.eject_card()?;

    println!("\nJournal:");
    for record in atm.journal().entries() {
        println!(
            "   {} {:?} {} {:?}",
            record.account, record.kind, record.amount, record.outcome
        );
    }
    println!("Phases: {:?}", atm.history().path());

    println!("\n=== Walkthrough Complete ===");
    Ok(())
}
