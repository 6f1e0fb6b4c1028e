pub(crate) use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shop-ledger",
    author,
    version,
    about = "Balance ledger and top-up approval engine",
    long_about = None,
    after_help = "OUTPUT:\n    Listings are printed to stdout in CSV format.\n    Use shell redirection to save to a file:\n\n    shop-ledger --data data.json topups --pending > pending.csv"
)]
pub struct Args {
    /// Path to the ledger snapshot file
    #[arg(long, value_name = "FILE", default_value = "data.json")]
    pub data: PathBuf,

    /// Path to the service catalog, a JSON array of {id, name, price, active}
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account with a zero balance
    Register {
        /// Display name for the new account
        display_name: String,
    },
    /// Submit a top-up request and print its reference code
    Topup {
        /// Account id
        account: String,
        /// Top-up method: bank-transfer (bank) or prepaid-card (card)
        method: String,
        /// Declared amount in the smallest currency unit
        amount: u64,
        /// Method-specific detail for the admin (card serial, payer account)
        #[arg(long)]
        details: Option<String>,
    },
    /// Approve a pending top-up, crediting its net amount
    Approve {
        /// Top-up request id
        request: String,
        /// Optional admin note
        #[arg(long)]
        note: Option<String>,
    },
    /// Reject a pending top-up; the balance stays untouched
    Reject {
        /// Top-up request id
        request: String,
        /// Optional reason
        #[arg(long)]
        note: Option<String>,
    },
    /// Purchase a catalog service against account balance
    Purchase {
        /// Account id
        account: String,
        /// Service id from the catalog
        service: String,
        /// Optional buyer note
        #[arg(long)]
        note: Option<String>,
    },
    /// Export all accounts as CSV
    Accounts,
    /// Export top-up requests as CSV
    Topups {
        /// Only requests still awaiting a decision
        #[arg(long)]
        pending: bool,
    },
}
