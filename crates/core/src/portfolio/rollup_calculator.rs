//! Cross-class aggregation of valued instruments and balances.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::rollup_model::{BreakdownItem, CurrencyBreakdown, PortfolioRollup, PortfolioSnapshot};
use crate::constants::DECIMAL_PRECISION;
use crate::instruments::{
    Currency, CurrencyTotals, InstrumentClass, InstrumentRecord, InstrumentSummary,
};
use crate::valuation::ValuationEngine;

const CASH_KEY: &str = "cash";
const OTHER_ASSETS_KEY: &str = "otherAssets";
const GOAL_SAVINGS_KEY: &str = "goalSavings";

/// Tile totals for one class. Terminal instruments are only counted.
pub fn summarize_class(
    class: InstrumentClass,
    instruments: &[InstrumentRecord],
    engine: &ValuationEngine,
    as_of: NaiveDate,
) -> InstrumentSummary {
    let mut inr = CurrencyTotals::default();
    let mut usd = CurrencyTotals::default();
    let mut count = 0;
    let mut closed_count = 0;

    for record in instruments.iter().filter(|r| r.class() == class) {
        if !record.is_open() {
            closed_count += 1;
            continue;
        }
        count += 1;
        let valuation = engine.value(record, as_of);
        let totals = match record.currency() {
            Currency::Inr => &mut inr,
            Currency::Usd => &mut usd,
        };
        totals.invested += valuation.invested;
        totals.current_value += valuation.current_value;
    }

    InstrumentSummary {
        class,
        total_invested: inr.invested.round_dp(DECIMAL_PRECISION),
        current_value: inr.current_value.round_dp(DECIMAL_PRECISION),
        usd: CurrencyTotals {
            invested: usd.invested.round_dp(DECIMAL_PRECISION),
            current_value: usd.current_value.round_dp(DECIMAL_PRECISION),
        },
        count,
        closed_count,
    }
}

/// Net worth and chart breakdowns as of `as_of`.
pub fn rollup(
    snapshot: &PortfolioSnapshot,
    engine: &ValuationEngine,
    as_of: NaiveDate,
) -> PortfolioRollup {
    let mut by_currency = CurrencyBreakdown::default();
    let mut class_values: BTreeMap<(InstrumentClass, Currency), Decimal> = BTreeMap::new();

    for record in snapshot.instruments.iter().filter(|r| r.is_open()) {
        let valuation = engine.value(record, as_of);
        let currency = record.currency();
        let totals = by_currency.totals_mut(currency);
        totals.invested += valuation.invested;
        totals.current_value += valuation.current_value;
        *class_values.entry((record.class(), currency)).or_insert(Decimal::ZERO) +=
            valuation.current_value;
    }

    let mut cash_total = Decimal::ZERO;
    let mut usd_cash_total = Decimal::ZERO;
    for account in &snapshot.cash_accounts {
        match account.currency {
            Currency::Inr => cash_total += account.balance,
            Currency::Usd => usd_cash_total += account.balance,
        }
    }
    let other_assets_total: Decimal = snapshot.other_assets.iter().map(|a| a.value).sum();
    let goal_savings_total: Decimal = snapshot.savings_goals.iter().map(|g| g.saved_amount).sum();

    let net_worth =
        cash_total + other_assets_total + by_currency.inr.current_value + goal_savings_total;
    let usd_net_worth = usd_cash_total + by_currency.usd.current_value;

    let by_class: Vec<BreakdownItem> = class_values
        .iter()
        .map(|((class, currency), value)| BreakdownItem {
            category: class.key().to_string(),
            name: class.display_name().to_string(),
            value: value.round_dp(DECIMAL_PRECISION),
            currency: *currency,
        })
        .collect();

    let mut by_category = vec![
        breakdown(CASH_KEY, "Cash", cash_total, Currency::Inr),
        breakdown(CASH_KEY, "Cash", usd_cash_total, Currency::Usd),
        breakdown(OTHER_ASSETS_KEY, "Other Assets", other_assets_total, Currency::Inr),
        breakdown(GOAL_SAVINGS_KEY, "Goal Savings", goal_savings_total, Currency::Inr),
    ];
    by_category.extend(by_class.iter().cloned());

    PortfolioRollup {
        as_of,
        net_worth: net_worth.round_dp(DECIMAL_PRECISION),
        usd_net_worth: usd_net_worth.round_dp(DECIMAL_PRECISION),
        by_currency: CurrencyBreakdown {
            inr: round_totals(&by_currency.inr),
            usd: round_totals(&by_currency.usd),
        },
        by_class: chart_series(by_class),
        by_category: chart_series(by_category),
        cash_total,
        usd_cash_total,
        other_assets_total,
        goal_savings_total,
    }
}

fn breakdown(category: &str, name: &str, value: Decimal, currency: Currency) -> BreakdownItem {
    BreakdownItem {
        category: category.to_string(),
        name: name.to_string(),
        value,
        currency,
    }
}

fn round_totals(totals: &CurrencyTotals) -> CurrencyTotals {
    CurrencyTotals {
        invested: totals.invested.round_dp(DECIMAL_PRECISION),
        current_value: totals.current_value.round_dp(DECIMAL_PRECISION),
    }
}

/// Drops zero slices; INR slices first, each currency sorted by value descending.
fn chart_series(mut items: Vec<BreakdownItem>) -> Vec<BreakdownItem> {
    items.retain(|item| !item.value.is_zero());
    items.sort_by(|a, b| {
        (a.currency != Currency::Inr)
            .cmp(&(b.currency != Currency::Inr))
            .then_with(|| b.value.cmp(&a.value))
    });
    items
}
