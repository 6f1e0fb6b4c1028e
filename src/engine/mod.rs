//! Ledger engine module.
//!
//! This module contains the core ledger logic including:
//! - `LedgerEngine` - The operation surface (top-ups, approvals, purchases)
//! - `Account` - Balance-holding account state
//! - `TopUpRequest` / `Order` types - The approval and purchase records
//! - `FeeSchedule` / `ServiceCatalog` - Process-wide configuration
//! - `Error` types - Storage and business-rule errors

mod account;
mod catalog;
mod error;
mod fees;
mod ledger;
mod order;
mod topup;

pub(crate) use rust_decimal::Decimal;

pub use account::{Account, AccountId};
pub use catalog::{Service, ServiceCatalog, ServiceId};
pub use error::{Error, ErrorKind, OperationError, StorageError};
pub use fees::{net_credit, FeeSchedule, FeeTier};
pub use ledger::{History, LedgerEngine, Purchase, Resolution};
pub use order::{Order, OrderId, OrderStatus};
pub use topup::{
    BankTopUp, CardTopUp, Decision, TopUpId, TopUpMethod, TopUpRequest, TopUpStatus,
};

/// Prefixed random identifier, e.g. `tp_4f9c…`.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}{}", uuid::Uuid::new_v4().simple())
}
