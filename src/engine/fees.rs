use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::Decimal;

/// Prepaid-card denominations accepted by default.
pub const CARD_DENOMINATIONS: [u64; 5] = [20_000, 50_000, 100_000, 200_000, 500_000];

/// Card amounts below this incur the highest fee rate.
pub const CARD_LOW_TIER_LIMIT: u64 = 50_000;

/// Card amounts at or above this incur the mid fee rate.
pub const CARD_HIGH_TIER_START: u64 = 200_000;

/// Minimum accepted bank-transfer amount.
pub const BANK_TRANSFER_MINIMUM: u64 = 1_000;

/// Fee schedule for top-up requests.
///
/// Breakpoints and rates are deployment configuration, not domain rules;
/// the defaults are one concrete schedule and deployments override them by
/// deserializing their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Exact amounts accepted for prepaid-card top-ups.
    pub card_denominations: Vec<u64>,
    /// Card fee tiers, ascending by `min_amount`. The applicable tier is
    /// the last one whose `min_amount` does not exceed the declared amount.
    pub card_tiers: Vec<FeeTier>,
    /// Minimum declared amount for a bank transfer.
    pub bank_minimum: u64,
    /// Optional fee rate for bank transfers. `None` credits the declared
    /// amount in full.
    pub bank_fee_rate: Option<Decimal>,
}

/// One row of the card fee table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeeTier {
    pub min_amount: u64,
    pub rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            card_denominations: CARD_DENOMINATIONS.to_vec(),
            card_tiers: vec![
                FeeTier {
                    min_amount: 0,
                    rate: Decimal::new(20, 2),
                },
                FeeTier {
                    min_amount: CARD_LOW_TIER_LIMIT,
                    rate: Decimal::new(10, 2),
                },
                FeeTier {
                    min_amount: CARD_HIGH_TIER_START,
                    rate: Decimal::new(15, 2),
                },
            ],
            bank_minimum: BANK_TRANSFER_MINIMUM,
            bank_fee_rate: None,
        }
    }
}

impl FeeSchedule {
    /// Whether `amount` is an accepted card denomination.
    pub fn is_card_denomination(&self, amount: u64) -> bool {
        self.card_denominations.contains(&amount)
    }

    /// Fee rate for a card top-up of `amount`.
    pub fn card_rate(&self, amount: u64) -> Decimal {
        self.card_tiers
            .iter()
            .rev()
            .find(|tier| amount >= tier.min_amount)
            .map_or(Decimal::ZERO, |tier| tier.rate)
    }
}

/// Net credit after deducting `rate` from `amount`, rounded down.
/// Fixed at request-creation time and never recomputed.
pub fn net_credit(amount: u64, rate: Decimal) -> u64 {
    debug_assert!(
        rate >= Decimal::ZERO && rate <= Decimal::ONE,
        "fee rate out of range"
    );
    let net = (Decimal::from(amount) * (Decimal::ONE - rate)).floor();
    net.to_u64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_card_rates_by_tier() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.card_rate(20_000), dec!(0.20));
        assert_eq!(schedule.card_rate(50_000), dec!(0.10));
        assert_eq!(schedule.card_rate(100_000), dec!(0.10));
        assert_eq!(schedule.card_rate(200_000), dec!(0.15));
        assert_eq!(schedule.card_rate(500_000), dec!(0.15));
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.card_rate(CARD_LOW_TIER_LIMIT - 1), dec!(0.20));
        assert_eq!(schedule.card_rate(CARD_LOW_TIER_LIMIT), dec!(0.10));
        assert_eq!(schedule.card_rate(CARD_HIGH_TIER_START - 1), dec!(0.10));
        assert_eq!(schedule.card_rate(CARD_HIGH_TIER_START), dec!(0.15));
    }

    #[test]
    fn test_denomination_allow_list() {
        let schedule = FeeSchedule::default();
        assert!(schedule.is_card_denomination(20_000));
        assert!(schedule.is_card_denomination(500_000));
        assert!(!schedule.is_card_denomination(30_000));
        assert!(!schedule.is_card_denomination(0));
    }

    #[test]
    fn test_net_credit_floors() {
        assert_eq!(net_credit(20_000, dec!(0.20)), 16_000);
        assert_eq!(net_credit(100_000, dec!(0.10)), 90_000);
        // 99_999 * 0.85 = 84_999.15, floored
        assert_eq!(net_credit(99_999, dec!(0.15)), 84_999);
        assert_eq!(net_credit(100_000, Decimal::ZERO), 100_000);
    }

    #[test]
    fn test_net_credit_is_deterministic() {
        for _ in 0..10 {
            assert_eq!(net_credit(200_000, dec!(0.15)), 170_000);
        }
    }

    #[test]
    fn test_schedule_deserializes_from_config_json() {
        let json = r#"{
            "card_denominations": [10000, 20000],
            "card_tiers": [
                {"min_amount": 0, "rate": "0.20"},
                {"min_amount": 100000, "rate": "0.15"}
            ],
            "bank_minimum": 5000,
            "bank_fee_rate": "0.02"
        }"#;
        let schedule: FeeSchedule = serde_json::from_str(json).unwrap();
        assert!(schedule.is_card_denomination(10_000));
        assert_eq!(schedule.card_rate(100_000), dec!(0.15));
        assert_eq!(schedule.bank_minimum, 5_000);
        assert_eq!(schedule.bank_fee_rate, Some(dec!(0.02)));
    }
}
