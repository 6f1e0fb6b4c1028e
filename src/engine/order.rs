use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::catalog::{Service, ServiceId};

pub type OrderId = String;

/// Longest stored buyer/admin note; longer input is clipped, not rejected.
pub(crate) const NOTE_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Created,
    InProgress,
    Done,
    Cancelled,
}

impl OrderStatus {
    /// `Done` and `Cancelled` orders accept no further updates.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Done | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "created"),
            OrderStatus::InProgress => write!(f, "in-progress"),
            OrderStatus::Done => write!(f, "done"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A record of a service purchased against account balance.
///
/// Price and name are snapshots taken at purchase time; later catalog
/// edits never rewrite existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    account_id: AccountId,
    service_id: ServiceId,
    service_name: String,
    /// Price charged, in the smallest currency unit.
    price: u64,
    note: Option<String>,
    status: OrderStatus,
    admin_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    pub(crate) fn new(account_id: AccountId, service: &Service, note: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id("od_"),
            account_id,
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            price: service.price,
            note,
            status: OrderStatus::Created,
            admin_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the order identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owning account identifier
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the price charged at purchase time
    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply an admin update. The engine rejects updates to closed orders
    /// before calling this.
    ///
    /// # Panics (debug only)
    /// Panics if the order is already closed.
    pub(crate) fn update(&mut self, status: Option<OrderStatus>, admin_note: Option<String>) {
        debug_assert!(!self.status.is_terminal(), "update called on closed order");
        if let Some(status) = status {
            self.status = status;
        }
        if admin_note.is_some() {
            self.admin_note = admin_note;
        }
        self.updated_at = Utc::now();
    }
}

/// Clip a note to [`NOTE_MAX_CHARS`] characters.
pub(crate) fn clip_note(note: &str) -> String {
    match note.char_indices().nth(NOTE_MAX_CHARS) {
        Some((idx, _)) => note[..idx].to_string(),
        None => note.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Service {
        Service {
            id: "boost".to_string(),
            name: "Account boost".to_string(),
            price: 50_000,
            active: true,
        }
    }

    #[test]
    fn test_new_order_snapshots_service() {
        let order = Order::new("u_1".to_string(), &service(), None);

        assert_eq!(order.account_id(), "u_1");
        assert_eq!(order.service_id(), "boost");
        assert_eq!(order.service_name(), "Account boost");
        assert_eq!(order.price(), 50_000);
        assert_eq!(order.status(), OrderStatus::Created);
        assert!(order.admin_note().is_none());
    }

    #[test]
    fn test_update_sets_status_and_note() {
        let mut order = Order::new("u_1".to_string(), &service(), None);
        order.update(Some(OrderStatus::InProgress), Some("started".to_string()));

        assert_eq!(order.status(), OrderStatus::InProgress);
        assert_eq!(order.admin_note(), Some("started"));
        assert!(order.updated_at() >= order.created_at());
    }

    #[test]
    fn test_update_keeps_note_when_omitted() {
        let mut order = Order::new("u_1".to_string(), &service(), None);
        order.update(Some(OrderStatus::InProgress), Some("started".to_string()));
        order.update(Some(OrderStatus::Done), None);

        assert_eq!(order.status(), OrderStatus::Done);
        assert_eq!(order.admin_note(), Some("started"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Created.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(OrderStatus::Done.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_clip_note_respects_char_boundaries() {
        let short = clip_note("hello");
        assert_eq!(short, "hello");

        let long: String = "é".repeat(NOTE_MAX_CHARS + 50);
        let clipped = clip_note(&long);
        assert_eq!(clipped.chars().count(), NOTE_MAX_CHARS);
    }
}
