//! Balance ledger and top-up approval engine for a small shop backend.
//!
//! Users hold an integral, never-negative balance. They submit top-up
//! requests (bank transfer or prepaid card) carrying a computed fee and a
//! short reference code; an admin resolves each request exactly once,
//! crediting the net amount atomically on approval. Purchases debit the
//! balance atomically with order creation, snapshotting the catalog price.
//!
//! The authenticated request-handling layer (HTTP routing, sessions, input
//! parsing) lives elsewhere and calls into [`LedgerEngine`]; this crate
//! trusts the account identifiers it is handed.

mod engine;
mod store;

pub use engine::{
    Account, AccountId, BankTopUp, CardTopUp, Decision, Error, ErrorKind, FeeSchedule, FeeTier,
    History, LedgerEngine, OperationError, Order, OrderId, OrderStatus, Purchase, Resolution,
    Service, ServiceCatalog, ServiceId, StorageError, TopUpId, TopUpMethod, TopUpRequest,
    TopUpStatus, net_credit,
};
pub use store::LedgerStore;
