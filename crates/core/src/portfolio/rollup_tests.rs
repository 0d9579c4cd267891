use super::*;
use crate::fixed_deposits::FixedDeposit;
use crate::instruments::{Currency, InstrumentClass, InstrumentRecord};
use crate::lifecycle::{
    FixedDepositStatus, MutualFundStatus, RecurringDepositStatus, TradableStatus,
};
use crate::mutual_funds::MutualFund;
use crate::recurring_deposits::{Frequency, RecurringDeposit};
use crate::tradables::{Market, TradablePosition};
use crate::valuation::ValuationEngine;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn created() -> NaiveDateTime {
    d(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()
}

fn fixed_deposit(id: i64, amount: Decimal, status: FixedDepositStatus) -> InstrumentRecord {
    InstrumentRecord::FixedDeposit(FixedDeposit {
        id,
        name: format!("FD {}", id),
        invested_amount: amount,
        interest_rate: dec!(7),
        start_date: d(2024, 1, 1),
        maturity_date: d(2025, 1, 1),
        status,
        notes: None,
        created_at: created(),
    })
}

fn mutual_fund(id: i64, units: Decimal, nav: Decimal, invested: Decimal) -> InstrumentRecord {
    InstrumentRecord::MutualFund(MutualFund {
        id,
        name: format!("Fund {}", id),
        scheme_code: None,
        sip_amount: None,
        start_date: d(2024, 1, 1),
        total_units: units,
        current_nav: nav,
        last_nav_date: None,
        total_invested: invested,
        status: MutualFundStatus::Ongoing,
        notes: None,
        created_at: created(),
        installments: Vec::new(),
    })
}

fn recurring_deposit(id: i64, installment: Decimal, paid: u32) -> InstrumentRecord {
    InstrumentRecord::RecurringDeposit(RecurringDeposit {
        id,
        name: format!("RD {}", id),
        installment_amount: installment,
        frequency: Frequency::Monthly,
        interest_rate: dec!(6.5),
        start_date: d(2024, 1, 10),
        total_installments: 12,
        installments_paid: paid,
        last_paid_date: None,
        status: RecurringDepositStatus::Ongoing,
        notes: None,
        created_at: created(),
    })
}

fn tradable(
    id: i64,
    market: Market,
    quantity: Decimal,
    buy: Decimal,
    current: Decimal,
    status: TradableStatus,
) -> InstrumentRecord {
    InstrumentRecord::Tradable(TradablePosition {
        id,
        name: format!("Position {}", id),
        symbol: format!("SYM{}", id),
        lookup_id: None,
        market,
        quantity,
        buy_price: buy,
        buy_date: d(2024, 1, 2),
        current_price: current,
        status,
        notes: None,
        created_at: created(),
    })
}

fn mixed_snapshot() -> PortfolioSnapshot {
    PortfolioSnapshot {
        instruments: vec![
            fixed_deposit(1, dec!(100000), FixedDepositStatus::Ongoing),
            fixed_deposit(
                2,
                dec!(50000),
                FixedDepositStatus::Closed {
                    actual_withdrawal: dec!(53000),
                    closed_date: d(2024, 3, 1),
                },
            ),
            mutual_fund(3, dec!(225), dec!(45), dec!(10000)),
            recurring_deposit(4, dec!(5000), 3),
            tradable(5, Market::IndianEquity, dec!(10), dec!(100), dec!(120), TradableStatus::Holding),
            tradable(6, Market::UsEquity, dec!(2), dec!(100), dec!(150), TradableStatus::Holding),
            tradable(
                7,
                Market::Crypto,
                dec!(1),
                dec!(500),
                dec!(900),
                TradableStatus::Sold {
                    sell_price: dec!(800),
                    sell_date: d(2024, 4, 1),
                },
            ),
        ],
        cash_accounts: vec![
            CashAccount {
                id: 1,
                name: "Savings".to_string(),
                balance: dec!(50000),
                currency: Currency::Inr,
            },
            CashAccount {
                id: 2,
                name: "Brokerage USD".to_string(),
                balance: dec!(1000),
                currency: Currency::Usd,
            },
        ],
        other_assets: vec![OtherAsset {
            id: 1,
            name: "Gold".to_string(),
            value: dec!(20000),
        }],
        savings_goals: vec![SavingsGoal {
            id: 1,
            name: "Vacation".to_string(),
            target_amount: dec!(100000),
            saved_amount: dec!(5000),
        }],
    }
}

#[test]
fn test_net_worth_counts_open_inr_instruments_and_balances() {
    let result = rollup(&mixed_snapshot(), &ValuationEngine::default(), d(2024, 6, 1));

    // 50000 cash + 20000 gold + 126325 instruments + 5000 goals.
    assert_eq!(result.net_worth, dec!(201325));
    assert_eq!(result.usd_net_worth, dec!(1300));
    assert_eq!(result.cash_total, dec!(50000));
    assert_eq!(result.usd_cash_total, dec!(1000));
    assert_eq!(result.goal_savings_total, dec!(5000));
}

#[test]
fn test_currencies_are_never_mixed() {
    let result = rollup(&mixed_snapshot(), &ValuationEngine::default(), d(2024, 6, 1));

    assert_eq!(result.by_currency.inr.invested, dec!(126000));
    assert_eq!(result.by_currency.inr.current_value, dec!(126325));
    assert_eq!(result.by_currency.usd.invested, dec!(200));
    assert_eq!(result.by_currency.usd.current_value, dec!(300));
}

#[test]
fn test_class_breakdown_sorted_without_zero_slices() {
    let mut snapshot = mixed_snapshot();
    snapshot
        .instruments
        .push(mutual_fund(8, Decimal::ZERO, dec!(30), Decimal::ZERO));
    let result = rollup(&snapshot, &ValuationEngine::default(), d(2024, 6, 1));

    let slices: Vec<(&str, Decimal, Currency)> = result
        .by_class
        .iter()
        .map(|item| (item.category.as_str(), item.value, item.currency))
        .collect();
    assert_eq!(
        slices,
        vec![
            ("fixedDeposits", dec!(100000), Currency::Inr),
            ("recurringDeposits", dec!(15000), Currency::Inr),
            ("mutualFunds", dec!(10125), Currency::Inr),
            ("tradables", dec!(1200), Currency::Inr),
            ("tradables", dec!(300), Currency::Usd),
        ]
    );
}

#[test]
fn test_category_breakdown_includes_balances() {
    let result = rollup(&mixed_snapshot(), &ValuationEngine::default(), d(2024, 6, 1));

    let names: Vec<&str> = result.by_category.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Fixed Deposits",
            "Cash",
            "Other Assets",
            "Recurring Deposits",
            "Mutual Funds",
            "Goal Savings",
            "Stocks & Crypto",
            "Cash",
            "Stocks & Crypto",
        ]
    );
    let inr_total: Decimal = result
        .by_category
        .iter()
        .filter(|i| i.currency == Currency::Inr)
        .map(|i| i.value)
        .sum();
    assert_eq!(inr_total, result.net_worth);
}

#[test]
fn test_empty_snapshot_rolls_up_to_zero() {
    let result = rollup(
        &PortfolioSnapshot::default(),
        &ValuationEngine::default(),
        d(2024, 6, 1),
    );
    assert_eq!(result.net_worth, Decimal::ZERO);
    assert_eq!(result.usd_net_worth, Decimal::ZERO);
    assert!(result.by_class.is_empty());
    assert!(result.by_category.is_empty());
}

#[test]
fn test_matured_fixed_deposit_contributes_expected_withdrawal() {
    let snapshot = PortfolioSnapshot {
        instruments: vec![fixed_deposit(1, dec!(100000), FixedDepositStatus::Ongoing)],
        ..PortfolioSnapshot::default()
    };
    let before = rollup(&snapshot, &ValuationEngine::default(), d(2024, 12, 31));
    let after = rollup(&snapshot, &ValuationEngine::default(), d(2025, 1, 1));

    assert_eq!(before.net_worth, dec!(100000));
    assert!(after.net_worth > dec!(107000));
}

#[test]
fn test_summarize_class_counts_closed_separately() {
    let snapshot = mixed_snapshot();
    let engine = ValuationEngine::default();

    let fds = summarize_class(
        InstrumentClass::FixedDeposit,
        &snapshot.instruments,
        &engine,
        d(2024, 6, 1),
    );
    assert_eq!(fds.count, 1);
    assert_eq!(fds.closed_count, 1);
    assert_eq!(fds.total_invested, dec!(100000));

    let tradables = summarize_class(
        InstrumentClass::Tradable,
        &snapshot.instruments,
        &engine,
        d(2024, 6, 1),
    );
    assert_eq!(tradables.count, 2);
    assert_eq!(tradables.closed_count, 1);
    assert_eq!(tradables.current_value, dec!(1200));
    assert_eq!(tradables.usd.current_value, dec!(300));
}

#[test]
fn test_goal_progress_is_capped() {
    let goal = SavingsGoal {
        id: 1,
        name: "Car".to_string(),
        target_amount: dec!(1000),
        saved_amount: dec!(1500),
    };
    assert_eq!(goal.progress_percent(), dec!(100));
    let halfway = SavingsGoal {
        saved_amount: dec!(500),
        ..goal
    };
    assert_eq!(halfway.progress_percent(), dec!(50));
}
