use crate::engine::error::OperationError;
use crate::engine::fees::{net_credit, FeeSchedule};
use crate::engine::topup::{TopUpDraft, TopUpMethod};
use crate::engine::Decimal;

/// A validated prepaid-card top-up.
///
/// Card amounts come from a fixed denomination allow-list and carry a
/// tiered fee; the net credit is fixed here, so approval later credits
/// exactly this amount.
#[derive(Debug, Clone, Copy)]
pub struct CardTopUp {
    amount: u64,
    fee_rate: Decimal,
    net_credit: u64,
}

impl CardTopUp {
    /// Validate a declared card denomination against the schedule.
    pub fn validate(amount: u64, schedule: &FeeSchedule) -> Result<Self, OperationError> {
        if !schedule.is_card_denomination(amount) {
            return Err(OperationError::InvalidAmount {
                method: TopUpMethod::PrepaidCard,
                amount,
            });
        }
        let fee_rate = schedule.card_rate(amount);
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

impl From<CardTopUp> for TopUpDraft {
    fn from(topup: CardTopUp) -> Self {
        TopUpDraft {
            method: TopUpMethod::PrepaidCard,
            amount: topup.amount,
            fee_rate: topup.fee_rate,
            net_credit: topup.net_credit,
        }
    }
}
