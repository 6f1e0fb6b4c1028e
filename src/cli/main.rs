mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Args, Command};
use shop_ledger::{Decision, FeeSchedule, LedgerEngine, ServiceCatalog, TopUpMethod};

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of warn (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let catalog = match &args.catalog {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;
            ServiceCatalog::from_reader(file)
                .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?
        }
        None => ServiceCatalog::default(),
    };

    let engine = LedgerEngine::open(&args.data, catalog, FeeSchedule::default())
        .with_context(|| format!("Failed to open ledger: {}", args.data.display()))?;

    match args.command {
        Command::Register { display_name } => {
            let account = engine.register_account(&display_name)?;
            println!("{} {}", account.id(), account.display_name());
        }
        Command::Topup {
            account,
            method,
            amount,
            details,
        } => {
            let method: TopUpMethod = method.parse()?;
            let request = engine.create_topup(&account, method, amount, details.as_deref())?;
            println!(
                "{} code={} net_credit={}",
                request.id(),
                request.reference_code(),
                request.net_credit()
            );
        }
        Command::Approve { request, note } => {
            let resolution = engine.resolve_topup(&request, Decision::Approve, note.as_deref())?;
            let balance = resolution.new_balance.unwrap_or_default();
            println!(
                "{} approved, credited {} -> balance {balance}",
                resolution.request.id(),
                resolution.request.net_credit()
            );
        }
        Command::Reject { request, note } => {
            let resolution = engine.resolve_topup(&request, Decision::Reject, note.as_deref())?;
            println!("{} rejected", resolution.request.id());
        }
        Command::Purchase {
            account,
            service,
            note,
        } => {
            let purchase = engine.purchase(&account, &service, note.as_deref())?;
            println!(
                "{} {} price={} -> balance {}",
                purchase.order.id(),
                purchase.order.service_name(),
                purchase.order.price(),
                purchase.new_balance
            );
        }
        Command::Accounts => {
            engine
                .export_accounts(std::io::stdout())
                .context("Failed to export accounts to stdout")?;
        }
        Command::Topups { pending } => {
            engine
                .export_topups(std::io::stdout(), pending)
                .context("Failed to export top-ups to stdout")?;
        }
    }

    Ok(())
}
