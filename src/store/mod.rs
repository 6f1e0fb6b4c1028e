//! Durable, serialized access to ledger state.
//!
//! One mutex guards every read-modify-write sequence, so two simultaneous
//! approvals or purchases against one account cannot interleave and lose
//! an update. Commits run against a draft copy of the state and swap it in
//! only after the snapshot is safely on disk, so neither memory nor the
//! file ever holds a half-applied mutation.

mod snapshot;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::engine::{
    Account, AccountId, Error, OperationError, Order, OrderId, StorageError, TopUpId, TopUpRequest,
};

/// Everything the ledger persists, as one snapshot unit.
///
/// BTree maps keep snapshots and exports deterministically ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LedgerState {
    pub accounts: BTreeMap<AccountId, Account>,
    pub topups: BTreeMap<TopUpId, TopUpRequest>,
    pub orders: BTreeMap<OrderId, Order>,
}

#[derive(Debug)]
enum Backend {
    /// Snapshot written to disk on every commit.
    File { path: PathBuf },
    /// In-memory only. Used by tests and demos.
    Ephemeral,
}

#[derive(Debug)]
struct Inner {
    state: LedgerState,
    backend: Backend,
}

/// Serialized, durable key-value access to accounts, requests, and orders.
#[derive(Debug)]
pub struct LedgerStore {
    inner: Mutex<Inner>,
}

impl LedgerStore {
    /// Open (or create) a file-backed store, running crash recovery first.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = snapshot::load(&path)?;
        log::info!(
            "Ledger store opened: {} accounts, {} top-ups, {} orders ({})",
            state.accounts.len(),
            state.topups.len(),
            state.orders.len(),
            path.display()
        );
        Ok(Self {
            inner: Mutex::new(Inner {
                state,
                backend: Backend::File { path },
            }),
        })
    }

    /// A store with no durability.
    pub fn ephemeral() -> Self {
        log::trace!("Ephemeral ledger store initialized");
        Self {
            inner: Mutex::new(Inner {
                state: LedgerState::default(),
                backend: Backend::Ephemeral,
            }),
        }
    }

    /// Run a read-only closure over the current state.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> T {
        let inner = self.lock();
        f(&inner.state)
    }

    /// Apply a mutation as a single unit of work.
    ///
    /// The closure runs against a draft copy: a business error discards
    /// the draft, and a persistence failure (after the bounded retries in
    /// the snapshot layer) leaves the in-memory state at its pre-commit
    /// value. The draft becomes visible to readers only once durable.
    pub(crate) fn commit<T>(
        &self,
        f: impl FnOnce(&mut LedgerState) -> Result<T, OperationError>,
    ) -> Result<T, Error> {
        let mut inner = self.lock();
        let mut draft = inner.state.clone();
        let out = f(&mut draft)?;
        if let Backend::File { path } = &inner.backend {
            snapshot::persist(path, &draft)?;
        }
        inner.state = draft;
        Ok(out)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic can only have poisoned a draft, never committed state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
