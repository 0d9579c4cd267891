//! Valuation result shared by every instrument class.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DECIMAL_PRECISION, PERCENT_PRECISION};

/// Point-in-time valuation of a single instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub invested: Decimal,
    pub current_value: Decimal,
    pub returns_percent: Decimal,
    /// Contracted payout at the end of the schedule, for fixed-term and recurring deposits.
    pub projected_maturity: Option<Decimal>,
}

impl Valuation {
    pub fn new(invested: Decimal, current_value: Decimal, projected_maturity: Option<Decimal>) -> Self {
        let invested = invested.round_dp(DECIMAL_PRECISION);
        let current_value = current_value.round_dp(DECIMAL_PRECISION);
        Self {
            invested,
            current_value,
            returns_percent: returns_percent(current_value, invested),
            projected_maturity: projected_maturity.map(|m| m.round_dp(DECIMAL_PRECISION)),
        }
    }

    pub fn gain(&self) -> Decimal {
        self.current_value - self.invested
    }
}

/// `(current - invested) / invested * 100`, or zero when nothing is invested.
/// Saturates when the ratio is out of range.
pub fn returns_percent(current_value: Decimal, invested: Decimal) -> Decimal {
    if invested.is_zero() {
        return Decimal::ZERO;
    }
    current_value
        .checked_sub(invested)
        .and_then(|gain| gain.checked_div(invested))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(PERCENT_PRECISION))
        .unwrap_or(if current_value >= invested {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}
