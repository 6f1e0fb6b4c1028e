use crate::engine::order::OrderStatus;
use crate::engine::topup::{TopUpMethod, TopUpStatus};

/// Top-level error type for the ledger engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Operation(#[from] OperationError),
}

impl Error {
    /// Coarse classification for callers that map errors onto transport
    /// status codes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Csv(_) | Error::Storage(_) => ErrorKind::Storage,
            Error::Operation(e) => e.kind(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad amount, denomination, or field. The caller's fault; not retried.
    Validation,
    /// Unknown account, request, service, or order.
    NotFound,
    /// Business-rule rejection (already resolved, insufficient balance).
    /// Not a system fault.
    Conflict,
    /// Durable-write failure that exhausted the store's retries.
    Storage,
}

/// Durable-write failures. The store retries these a bounded number of
/// times before they surface here.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot write failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Soft business-rule errors during ledger operations.
/// These reject the operation with no state change; we log and return them
/// to the caller.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("Invalid {method} amount: {amount}")]
    InvalidAmount { method: TopUpMethod, amount: u64 },

    #[error("Unknown top-up method: {0}")]
    UnknownMethod(String),

    #[error("Account {account} not found")]
    AccountNotFound { account: String },

    #[error("Top-up request {request} not found")]
    RequestNotFound { request: String },

    #[error("Service {service} not found or inactive")]
    ServiceNotFound { service: String },

    #[error("Order {order} not found")]
    OrderNotFound { order: String },

    #[error("Top-up request {request} already resolved: {status}")]
    AlreadyResolved {
        request: String,
        status: TopUpStatus,
    },

    #[error("Insufficient balance: account {account} has {balance}, needs {required}")]
    InsufficientBalance {
        account: String,
        balance: u64,
        required: u64,
    },

    #[error("Order {order} is closed: {status}")]
    OrderClosed { order: String, status: OrderStatus },
}

impl OperationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::InvalidAmount { .. } | OperationError::UnknownMethod(_) => {
                ErrorKind::Validation
            }
            OperationError::AccountNotFound { .. }
            | OperationError::RequestNotFound { .. }
            | OperationError::ServiceNotFound { .. }
            | OperationError::OrderNotFound { .. } => ErrorKind::NotFound,
            OperationError::AlreadyResolved { .. }
            | OperationError::InsufficientBalance { .. }
            | OperationError::OrderClosed { .. } => ErrorKind::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_kinds() {
        let err = OperationError::InvalidAmount {
            method: TopUpMethod::PrepaidCard,
            amount: 30_000,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = OperationError::AccountNotFound {
            account: "u_1".into(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = OperationError::InsufficientBalance {
            account: "u_1".into(),
            balance: 10_000,
            required: 50_000,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = OperationError::AlreadyResolved {
            request: "tp_1".into(),
            status: TopUpStatus::Approved,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_top_level_kind_follows_operation() {
        let err = Error::from(OperationError::UnknownMethod("paypal".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = Error::from(StorageError::Io(std::io::Error::other("disk gone")));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
