use crate::engine::error::OperationError;
use crate::engine::fees::{net_credit, FeeSchedule};
use crate::engine::topup::{TopUpDraft, TopUpMethod};
use crate::engine::Decimal;

/// A validated bank-transfer top-up.
///
/// Bank transfers credit the declared amount in full unless the schedule
/// sets an explicit bank fee policy; the user wires the money manually and
/// quotes the reference code in the transfer memo.
#[derive(Debug, Clone, Copy)]
pub struct BankTopUp {
    amount: u64,
    fee_rate: Decimal,
    net_credit: u64,
}

impl BankTopUp {
    /// Validate a declared bank-transfer amount against the schedule.
    pub fn validate(amount: u64, schedule: &FeeSchedule) -> Result<Self, OperationError> {
        if amount < schedule.bank_minimum {
            return Err(OperationError::InvalidAmount {
                method: TopUpMethod::BankTransfer,
                amount,
            });
        }
        let fee_rate = schedule.bank_fee_rate.unwrap_or(Decimal::ZERO);
        Ok(Self {
            amount,
            fee_rate,
            net_credit: net_credit(amount, fee_rate),
        })
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    pub fn net_credit(&self) -> u64 {
        self.net_credit
    }
}

impl From<BankTopUp> for TopUpDraft {
    fn from(topup: BankTopUp) -> Self {
        TopUpDraft {
            method: TopUpMethod::BankTransfer,
            amount: topup.amount,
            fee_rate: topup.fee_rate,
            net_credit: topup.net_credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_transfer_credits_full_amount() {
        let schedule = FeeSchedule::default();
        let topup = BankTopUp::validate(100_000, &schedule).unwrap();

        assert_eq!(topup.amount(), 100_000);
        assert_eq!(topup.fee_rate(), Decimal::ZERO);
        assert_eq!(topup.net_credit(), 100_000);
    }

    #[test]
    fn test_minimum_is_inclusive() {
        let schedule = FeeSchedule::default();
        let topup = BankTopUp::validate(schedule.bank_minimum, &schedule).unwrap();
        assert_eq!(topup.net_credit(), schedule.bank_minimum);
    }

    #[test]
    fn test_rejects_below_minimum() {
        let schedule = FeeSchedule::default();
        let err = BankTopUp::validate(500, &schedule).unwrap_err();

        assert!(matches!(
            err,
            OperationError::InvalidAmount {
                method: TopUpMethod::BankTransfer,
                amount: 500,
            }
        ));
    }

    #[test]
    fn test_rejects_zero_amount() {
        let schedule = FeeSchedule::default();
        assert!(BankTopUp::validate(0, &schedule).is_err());
    }

    #[test]
    fn test_bank_fee_policy_applies_when_configured() {
        let schedule = FeeSchedule {
            bank_fee_rate: Some(dec!(0.02)),
            ..FeeSchedule::default()
        };
        let topup = BankTopUp::validate(100_000, &schedule).unwrap();

        assert_eq!(topup.fee_rate(), dec!(0.02));
        assert_eq!(topup.net_credit(), 98_000);
    }
}
