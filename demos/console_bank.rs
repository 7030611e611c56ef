//! Console bank
//!
//! Seeds ten customers, serves them on the deposit and loan lanes, and
//! prints the closing message followed by the JSON summary.
//!
//! Run with: RUST_LOG=info cargo run --example console_bank

use bank_manager::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Prints each customer as the clerks pick them up.
struct ConsolePrinter;

impl BankObserver for ConsolePrinter {
    fn on_start(&self, customer: &Customer) {
        println!("  Customer {} started: {}", customer.turn(), customer.task());
    }

    fn on_finish(&self, customer: &Customer) {
        println!("  Customer {} finished: {}", customer.turn(), customer.task());
    }

    fn on_summary(&self, summary: &BankSummary) {
        println!("\n{}", summary.closing_message());
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Bank Manager - Console Bank ===\n");

    let config = BankConfig::new()
        .with_name("console")
        .with_processing_time(Duration::from_millis(700));
    let bank = Bank::new(config, Arc::new(ConsolePrinter))?;

    println!("Waiting customers:");
    for customer in bank.waiting_customers() {
        println!("  {}", customer);
    }
    println!();

    let summary = bank.open()?;

    println!(
        "\nDeposit lane: {} served, peak {} running",
        summary.deposit.jobs_processed, summary.deposit.peak_running
    );
    println!(
        "Loan lane:    {} served, peak {} running",
        summary.loan.jobs_processed, summary.loan.peak_running
    );
    println!("\n{}", summary.to_json()?);

    Ok(())
}
