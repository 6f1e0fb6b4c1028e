use std::io::Write;
use std::path::PathBuf;

use super::account::Account;
use super::catalog::ServiceCatalog;
use super::error::{Error, OperationError};
use super::fees::FeeSchedule;
use super::order::{clip_note, Order, OrderStatus};
use super::topup::{
    BankTopUp, CardTopUp, Decision, TopUpDraft, TopUpMethod, TopUpRequest, TopUpStatus,
};
use crate::store::LedgerStore;

/// Outcome of resolving a top-up request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub request: TopUpRequest,
    /// Balance after an approval credit; `None` for rejections.
    pub new_balance: Option<u64>,
}

/// Outcome of a successful purchase.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub order: Order,
    pub new_balance: u64,
}

/// An account's combined activity, newest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub orders: Vec<Order>,
    pub topups: Vec<TopUpRequest>,
}

/// The core ledger engine.
///
/// Owns the durable store, the service catalog, and the fee schedule, and
/// exposes the operation surface the request-handling layer calls into.
/// Every mutation serializes through the store, so `&self` methods are
/// safe to share across threads.
#[derive(Debug)]
pub struct LedgerEngine {
    store: LedgerStore,
    catalog: ServiceCatalog,
    fees: FeeSchedule,
}

impl LedgerEngine {
    /// Open a file-backed engine, creating the snapshot file on first
    /// commit if it does not exist yet.
    pub fn open(
        path: impl Into<PathBuf>,
        catalog: ServiceCatalog,
        fees: FeeSchedule,
    ) -> Result<Self, Error> {
        let store = LedgerStore::open(path)?;
        Ok(Self::with_store(store, catalog, fees))
    }

    /// An engine over an in-memory store. Used by tests and demos.
    pub fn in_memory(catalog: ServiceCatalog, fees: FeeSchedule) -> Self {
        Self::with_store(LedgerStore::ephemeral(), catalog, fees)
    }

    pub fn with_store(store: LedgerStore, catalog: ServiceCatalog, fees: FeeSchedule) -> Self {
        log::trace!(
            "LedgerEngine initialized ({} catalog entries)",
            catalog.len()
        );
        Self {
            store,
            catalog,
            fees,
        }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Look up an account by id.
    pub fn account(&self, account_id: &str) -> Result<Account, Error> {
        self.store
            .read(|state| state.accounts.get(account_id).cloned())
            .ok_or_else(|| {
                OperationError::AccountNotFound {
                    account: account_id.to_string(),
                }
                .into()
            })
    }

    /// All accounts, ordered by id.
    pub fn accounts(&self) -> Vec<Account> {
        self.store.read(|state| state.accounts.values().cloned().collect())
    }

    /// Look up a top-up request by id.
    pub fn topup(&self, request_id: &str) -> Result<TopUpRequest, Error> {
        self.store
            .read(|state| state.topups.get(request_id).cloned())
            .ok_or_else(|| {
                OperationError::RequestNotFound {
                    request: request_id.to_string(),
                }
                .into()
            })
    }

    /// Look up an order by id.
    pub fn order(&self, order_id: &str) -> Result<Order, Error> {
        self.store
            .read(|state| state.orders.get(order_id).cloned())
            .ok_or_else(|| {
                OperationError::OrderNotFound {
                    order: order_id.to_string(),
                }
                .into()
            })
    }

    /// All top-up requests owned by an account.
    pub fn topups_for(&self, account_id: &str) -> Result<Vec<TopUpRequest>, Error> {
        self.account(account_id)?;
        Ok(self.store.read(|state| {
            state
                .topups
                .values()
                .filter(|topup| topup.account_id() == account_id)
                .cloned()
                .collect()
        }))
    }

    /// All orders owned by an account.
    pub fn orders_for(&self, account_id: &str) -> Result<Vec<Order>, Error> {
        self.account(account_id)?;
        Ok(self.store.read(|state| {
            state
                .orders
                .values()
                .filter(|order| order.account_id() == account_id)
                .cloned()
                .collect()
        }))
    }

    /// Requests still awaiting an admin decision, across all accounts.
    pub fn pending_topups(&self) -> Vec<TopUpRequest> {
        self.store.read(|state| {
            state
                .topups
                .values()
                .filter(|topup| topup.status() == TopUpStatus::Pending)
                .cloned()
                .collect()
        })
    }

    /// An account's combined orders and top-ups, newest first.
    pub fn history(&self, account_id: &str) -> Result<History, Error> {
        let mut orders = self.orders_for(account_id)?;
        let mut topups = self.topups_for(account_id)?;
        orders.sort_by_key(|order| std::cmp::Reverse(order.created_at()));
        topups.sort_by_key(|topup| std::cmp::Reverse(topup.created_at()));
        Ok(History { orders, topups })
    }

    /// Write all accounts to any sink as CSV, for admin reconciliation.
    pub fn export_accounts<W: Write>(&self, writer: W) -> Result<(), Error> {
        let accounts = self.accounts();
        log::info!("Exporting {} accounts", accounts.len());

        let mut csv_writer = csv::Writer::from_writer(writer);
        for account in &accounts {
            csv_writer.serialize(account)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write top-up requests to any sink as CSV. With `pending_only`, the
    /// output is the admin's work queue of reference codes to match
    /// against bank statements.
    pub fn export_topups<W: Write>(&self, writer: W, pending_only: bool) -> Result<(), Error> {
        let topups = if pending_only {
            self.pending_topups()
        } else {
            self.store.read(|state| state.topups.values().cloned().collect())
        };
        log::info!("Exporting {} top-up requests", topups.len());

        let mut csv_writer = csv::Writer::from_writer(writer);
        for topup in &topups {
            csv_writer.serialize(topup)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

// =============================================================================
// Operations
// =============================================================================

impl LedgerEngine {
    /// Register a new account with a zero balance.
    pub fn register_account(&self, display_name: &str) -> Result<Account, Error> {
        let account = Account::new(super::new_id("u_"), display_name.trim().to_string());
        log::debug!(
            "[register] account {} ({})",
            account.id(),
            account.display_name()
        );
        self.store.commit(|state| {
            state
                .accounts
                .insert(account.id().to_string(), account.clone());
            Ok(account.clone())
        })
    }

    /// Delete an account and everything it owns. Admin-only by contract;
    /// the caller has already authenticated the admin.
    pub fn remove_account(&self, account_id: &str) -> Result<(), Error> {
        self.store.commit(|state| {
            state
                .accounts
                .remove(account_id)
                .ok_or_else(|| OperationError::AccountNotFound {
                    account: account_id.to_string(),
                })?;
            state.topups.retain(|_, topup| topup.account_id() != account_id);
            state.orders.retain(|_, order| order.account_id() != account_id);
            Ok(())
        })?;
        log::info!("[remove] account {account_id} deleted with its orders and top-ups");
        Ok(())
    }

    /// Record a top-up request with a computed fee and reference code.
    /// `details` is the method-specific information the admin verifies
    /// manually (card serial, payer account). The balance is untouched
    /// until an admin approves the request.
    pub fn create_topup(
        &self,
        account_id: &str,
        method: TopUpMethod,
        amount: u64,
        details: Option<&str>,
    ) -> Result<TopUpRequest, Error> {
        log::trace!("[topup] account={account_id} method={method} amount={amount}");

        let draft: TopUpDraft = match method {
            TopUpMethod::BankTransfer => BankTopUp::validate(amount, &self.fees)?.into(),
            TopUpMethod::PrepaidCard => CardTopUp::validate(amount, &self.fees)?.into(),
        };
        let details = details.map(clip_note);

        self.store.commit(|state| {
            if !state.accounts.contains_key(account_id) {
                return Err(OperationError::AccountNotFound {
                    account: account_id.to_string(),
                });
            }
            let request = TopUpRequest::new(account_id.to_string(), draft, details);
            log::trace!(
                "[topup] recorded {} code={} net_credit={}",
                request.id(),
                request.reference_code(),
                request.net_credit()
            );
            state
                .topups
                .insert(request.id().to_string(), request.clone());
            Ok(request)
        })
    }

    /// Resolve a pending top-up request: approve (credit the net amount)
    /// or reject. Either way the request becomes immutable; a repeated
    /// call cannot double-credit.
    pub fn resolve_topup(
        &self,
        request_id: &str,
        decision: Decision,
        note: Option<&str>,
    ) -> Result<Resolution, Error> {
        log::trace!("[resolve] request={request_id} decision={decision:?}");
        let note = note.map(clip_note);

        self.store.commit(|state| {
            let request = {
                let request = state.topups.get_mut(request_id).ok_or_else(|| {
                    OperationError::RequestNotFound {
                        request: request_id.to_string(),
                    }
                })?;
                if request.status().is_terminal() {
                    return Err(OperationError::AlreadyResolved {
                        request: request_id.to_string(),
                        status: request.status(),
                    });
                }
                request.resolve(decision, note);
                request.clone()
            };

            let new_balance = match decision {
                Decision::Approve => {
                    let account = state.accounts.get_mut(request.account_id()).ok_or_else(
                        || OperationError::AccountNotFound {
                            account: request.account_id().to_string(),
                        },
                    )?;
                    account.credit(request.net_credit());
                    log::trace!(
                        "[resolve] request={} credited {} -> new_balance={}",
                        request.id(),
                        request.net_credit(),
                        account.balance()
                    );
                    Some(account.balance())
                }
                Decision::Reject => {
                    log::trace!("[resolve] request={} rejected", request.id());
                    None
                }
            };

            Ok(Resolution {
                request,
                new_balance,
            })
        })
    }

    /// Purchase a catalog service: the debit and the order insertion are
    /// one unit of work, and the price is snapshotted into the order.
    pub fn purchase(
        &self,
        account_id: &str,
        service_id: &str,
        note: Option<&str>,
    ) -> Result<Purchase, Error> {
        log::trace!("[purchase] account={account_id} service={service_id}");

        let service = self
            .catalog
            .purchasable(service_id)
            .ok_or_else(|| OperationError::ServiceNotFound {
                service: service_id.to_string(),
            })?
            .clone();
        let note = note.map(clip_note);

        self.store.commit(|state| {
            let account = state.accounts.get_mut(account_id).ok_or_else(|| {
                OperationError::AccountNotFound {
                    account: account_id.to_string(),
                }
            })?;

            if account.balance() < service.price {
                return Err(OperationError::InsufficientBalance {
                    account: account_id.to_string(),
                    balance: account.balance(),
                    required: service.price,
                });
            }

            account.debit(service.price);
            let new_balance = account.balance();

            let order = Order::new(account_id.to_string(), &service, note);
            log::trace!(
                "[purchase] order {} price={} -> new_balance={new_balance}",
                order.id(),
                order.price()
            );
            state.orders.insert(order.id().to_string(), order.clone());

            Ok(Purchase { order, new_balance })
        })
    }

    /// Admin update of an order's status and note. Closed orders reject
    /// further updates.
    pub fn update_order(
        &self,
        order_id: &str,
        status: Option<OrderStatus>,
        admin_note: Option<&str>,
    ) -> Result<Order, Error> {
        log::trace!("[order] update {order_id} status={status:?}");
        let admin_note = admin_note.map(clip_note);

        self.store.commit(|state| {
            let order = state.orders.get_mut(order_id).ok_or_else(|| {
                OperationError::OrderNotFound {
                    order: order_id.to_string(),
                }
            })?;
            if order.status().is_terminal() {
                return Err(OperationError::OrderClosed {
                    order: order_id.to_string(),
                    status: order.status(),
                });
            }
            order.update(status, admin_note);
            Ok(order.clone())
        })
    }
}
