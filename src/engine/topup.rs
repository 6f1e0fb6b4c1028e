mod bank;
mod card;

pub use bank::BankTopUp;
pub use card::CardTopUp;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::error::OperationError;
use super::Decimal;

pub type TopUpId = String;

/// Length of the random suffix in a reference code.
const CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"0123456789ABCDEF";

/// How the user claims to have paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopUpMethod {
    BankTransfer,
    PrepaidCard,
}

impl TopUpMethod {
    /// Prefix of reference codes issued for this method.
    pub fn code_prefix(self) -> &'static str {
        match self {
            TopUpMethod::BankTransfer => "NAP_",
            TopUpMethod::PrepaidCard => "CARD_",
        }
    }
}

impl std::fmt::Display for TopUpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopUpMethod::BankTransfer => write!(f, "bank-transfer"),
            TopUpMethod::PrepaidCard => write!(f, "prepaid-card"),
        }
    }
}

impl FromStr for TopUpMethod {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank-transfer" | "bank" => Ok(TopUpMethod::BankTransfer),
            "prepaid-card" | "card" => Ok(TopUpMethod::PrepaidCard),
            other => Err(OperationError::UnknownMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopUpStatus {
    Pending,
    Approved,
    Rejected,
}

impl TopUpStatus {
    /// Terminal statuses are immutable; only `Pending` can be resolved.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TopUpStatus::Pending)
    }
}

impl std::fmt::Display for TopUpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopUpStatus::Pending => write!(f, "pending"),
            TopUpStatus::Approved => write!(f, "approved"),
            TopUpStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Admin verdict over a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// A validated top-up, ready to be recorded as a pending request.
///
/// Produced by [`BankTopUp`] or [`CardTopUp`]; fee rate and net credit are
/// fixed here and never recomputed at approval time.
#[derive(Debug, Clone, Copy)]
pub struct TopUpDraft {
    pub(super) method: TopUpMethod,
    pub(super) amount: u64,
    pub(super) fee_rate: Decimal,
    pub(super) net_credit: u64,
}

/// A user-submitted claim of an external payment, awaiting admin
/// verification against a bank statement or card serial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopUpRequest {
    id: TopUpId,
    account_id: AccountId,
    method: TopUpMethod,
    /// Declared amount, as claimed by the user.
    amount: u64,
    fee_rate: Decimal,
    /// The amount actually credited on approval.
    net_credit: u64,
    /// Payment-memo token the admin matches against statements.
    reference_code: String,
    /// Method-specific detail the user supplied (card serial, payer
    /// account), for the admin's verification only.
    method_details: Option<String>,
    status: TopUpStatus,
    admin_note: Option<String>,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl TopUpRequest {
    pub(crate) fn new(
        account_id: AccountId,
        draft: TopUpDraft,
        method_details: Option<String>,
    ) -> Self {
        Self {
            id: super::new_id("tp_"),
            account_id,
            method: draft.method,
            amount: draft.amount,
            fee_rate: draft.fee_rate,
            net_credit: draft.net_credit,
            reference_code: reference_code(draft.method),
            method_details,
            status: TopUpStatus::Pending,
            admin_note: None,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    /// Returns the request identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owning account identifier
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn method(&self) -> TopUpMethod {
        self.method
    }

    /// Returns the declared amount
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns the fee rate fixed at creation time
    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// Returns the amount credited on approval
    pub fn net_credit(&self) -> u64 {
        self.net_credit
    }

    /// Returns the transfer-matching reference code
    pub fn reference_code(&self) -> &str {
        &self.reference_code
    }

    pub fn method_details(&self) -> Option<&str> {
        self.method_details.as_deref()
    }

    pub fn status(&self) -> TopUpStatus {
        self.status
    }

    pub fn admin_note(&self) -> Option<&str> {
        self.admin_note.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Apply the admin decision. The engine guarantees this runs at most
    /// once per request.
    ///
    /// # Panics (debug only)
    /// Panics if the request already left `Pending`.
    pub(crate) fn resolve(&mut self, decision: Decision, note: Option<String>) {
        debug_assert!(
            !self.status.is_terminal(),
            "resolve called on a resolved request"
        );
        self.status = match decision {
            Decision::Approve => TopUpStatus::Approved,
            Decision::Reject => TopUpStatus::Rejected,
        };
        self.admin_note = note;
        self.resolved_at = Some(Utc::now());
    }
}

/// Short human-typeable code the user puts in the payment memo and the
/// admin matches against manual bank statements.
fn reference_code(method: TopUpMethod) -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(method.code_prefix().len() + CODE_LEN);
    code.push_str(method.code_prefix());
    for _ in 0..CODE_LEN {
        let idx = rng.gen_range(0..CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[idx]));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft() -> TopUpDraft {
        TopUpDraft {
            method: TopUpMethod::PrepaidCard,
            amount: 20_000,
            fee_rate: dec!(0.20),
            net_credit: 16_000,
        }
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = TopUpRequest::new("u_1".to_string(), draft(), None);

        assert_eq!(request.account_id(), "u_1");
        assert_eq!(request.status(), TopUpStatus::Pending);
        assert_eq!(request.amount(), 20_000);
        assert_eq!(request.net_credit(), 16_000);
        assert!(request.resolved_at().is_none());
        assert!(request.admin_note().is_none());
    }

    #[test]
    fn test_reference_code_shape() {
        let request = TopUpRequest::new("u_1".to_string(), draft(), None);
        let code = request.reference_code();

        assert!(code.starts_with("CARD_"));
        assert_eq!(code.len(), "CARD_".len() + 6);
        assert!(code["CARD_".len()..]
            .bytes()
            .all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_resolve_approve_is_terminal() {
        let mut request = TopUpRequest::new("u_1".to_string(), draft(), None);
        request.resolve(Decision::Approve, Some("matched".to_string()));

        assert_eq!(request.status(), TopUpStatus::Approved);
        assert!(request.status().is_terminal());
        assert_eq!(request.admin_note(), Some("matched"));
        assert!(request.resolved_at().is_some());
    }

    #[test]
    fn test_resolve_reject_keeps_amounts() {
        let mut request = TopUpRequest::new("u_1".to_string(), draft(), None);
        request.resolve(Decision::Reject, None);

        assert_eq!(request.status(), TopUpStatus::Rejected);
        assert_eq!(request.net_credit(), 16_000);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            "bank-transfer".parse::<TopUpMethod>().unwrap(),
            TopUpMethod::BankTransfer
        );
        assert_eq!(
            " Card ".parse::<TopUpMethod>().unwrap(),
            TopUpMethod::PrepaidCard
        );
        assert!(matches!(
            "paypal".parse::<TopUpMethod>(),
            Err(OperationError::UnknownMethod(_))
        ));
    }
}
