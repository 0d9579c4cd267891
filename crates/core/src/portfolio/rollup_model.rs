//! Portfolio rollup models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balances_model::{CashAccount, OtherAsset, SavingsGoal};
use crate::instruments::{Currency, CurrencyTotals, InstrumentRecord};

/// Everything the rollup reads, taken from one consistent view of the ledger.
#[derive(Debug, Clone, Default)]
pub struct PortfolioSnapshot {
    pub instruments: Vec<InstrumentRecord>,
    pub cash_accounts: Vec<CashAccount>,
    pub other_assets: Vec<OtherAsset>,
    pub savings_goals: Vec<SavingsGoal>,
}

/// INR and USD totals, never converted into each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBreakdown {
    pub inr: CurrencyTotals,
    pub usd: CurrencyTotals,
}

impl CurrencyBreakdown {
    pub fn totals_mut(&mut self, currency: Currency) -> &mut CurrencyTotals {
        match currency {
            Currency::Inr => &mut self.inr,
            Currency::Usd => &mut self.usd,
        }
    }
}

/// Chart slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownItem {
    /// Stable key (e.g. "cash", "mutualFunds").
    pub category: String,
    pub name: String,
    pub value: Decimal,
    pub currency: Currency,
}

/// Point-in-time net worth and its breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRollup {
    pub as_of: NaiveDate,
    /// INR cash + other assets + INR instrument value + goal savings.
    pub net_worth: Decimal,
    /// USD cash + USD instrument value.
    pub usd_net_worth: Decimal,
    /// Open instruments only.
    pub by_currency: CurrencyBreakdown,
    pub by_class: Vec<BreakdownItem>,
    pub by_category: Vec<BreakdownItem>,
    pub cash_total: Decimal,
    pub usd_cash_total: Decimal,
    pub other_assets_total: Decimal,
    pub goal_savings_total: Decimal,
}
