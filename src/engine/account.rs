use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AccountId = String;

/// A registered user's balance-holding entity.
///
/// Balances are integral amounts in the smallest currency unit; the type
/// rules out negative values, and the engine checks funds before every
/// debit so the arithmetic here never wraps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    display_name: String,
    balance: u64,
    created_at: DateTime<Utc>,
}

impl Account {
    pub(crate) fn new(id: AccountId, display_name: String) -> Self {
        Self {
            id,
            display_name,
            balance: 0,
            created_at: Utc::now(),
        }
    }

    /// Returns the account identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the current balance in the smallest currency unit
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Returns the registration time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Credit the account with an approved net amount.
    ///
    /// # Panics (debug only)
    /// Panics if the credit would overflow the balance.
    pub(crate) fn credit(&mut self, amount: u64) {
        debug_assert!(
            self.balance.checked_add(amount).is_some(),
            "credit overflows balance"
        );
        self.balance += amount;
    }

    /// Debit the account for a purchase.
    /// Caller must ensure sufficient funds first.
    ///
    /// # Panics (debug only)
    /// Panics if the debit exceeds the balance.
    pub(crate) fn debit(&mut self, amount: u64) {
        debug_assert!(self.balance >= amount, "debit exceeds balance");
        self.balance -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("u_1".to_string(), "alice".to_string())
    }

    #[test]
    fn test_new_account_has_zero_balance() {
        let account = account();
        assert_eq!(account.id(), "u_1");
        assert_eq!(account.display_name(), "alice");
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut account = account();
        account.credit(100_000);
        account.credit(16_000);
        assert_eq!(account.balance(), 116_000);
    }

    #[test]
    fn test_debit_decreases_balance() {
        let mut account = account();
        account.credit(100_000);
        account.debit(40_000);
        assert_eq!(account.balance(), 60_000);
    }

    #[test]
    fn test_debit_to_exactly_zero() {
        let mut account = account();
        account.credit(50_000);
        account.debit(50_000);
        assert_eq!(account.balance(), 0);
    }

    #[test]
    fn test_serde_round_trip_keeps_private_fields() {
        let mut account = account();
        account.credit(75_000);

        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }
}
