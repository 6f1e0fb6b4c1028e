//! Basic walk-through of the `LedgerEngine`.
//!
//! Run with: `cargo run --example basic`

use shop_ledger::{
    Decision, FeeSchedule, LedgerEngine, Service, ServiceCatalog, TopUpMethod,
};

fn main() {
    // Initialize logger (optional, but shows what's happening)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let catalog = ServiceCatalog::new([
        Service {
            id: "boost".to_string(),
            name: "Account boost".to_string(),
            price: 50_000,
            active: true,
        },
        Service {
            id: "design".to_string(),
            name: "Banner design".to_string(),
            price: 120_000,
            active: true,
        },
    ]);

    let engine = LedgerEngine::in_memory(catalog, FeeSchedule::default());

    // A user registers and claims a 100 000 bank transfer
    let alice = engine.register_account("alice").expect("register failed");
    let topup = engine
        .create_topup(
            alice.id(),
            TopUpMethod::BankTransfer,
            100_000,
            Some("transfer from MB Bank account ending 0109"),
        )
        .expect("top-up failed");
    println!(
        "transfer memo for the bank app: {}",
        topup.reference_code()
    );

    // The admin finds the code on the bank statement and approves
    let resolution = engine
        .resolve_topup(topup.id(), Decision::Approve, Some("matched statement"))
        .expect("approval failed");
    println!(
        "approved, balance is now {}",
        resolution.new_balance.unwrap_or_default()
    );

    // The user spends part of the balance
    let purchase = engine
        .purchase(alice.id(), "boost", Some("same nickname as last time"))
        .expect("purchase failed");
    println!(
        "ordered {} for {}, balance is now {}",
        purchase.order.service_name(),
        purchase.order.price(),
        purchase.new_balance
    );

    // Export results to stdout
    println!("\n=== Accounts ===");
    engine
        .export_accounts(std::io::stdout())
        .expect("Failed to export accounts");

    println!("\n=== Top-ups ===");
    engine
        .export_topups(std::io::stdout(), false)
        .expect("Failed to export top-ups");
}
