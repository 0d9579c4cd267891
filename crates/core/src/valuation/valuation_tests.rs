use super::*;
use crate::fixed_deposits::FixedDeposit;
use crate::instruments::InstrumentRecord;
use crate::lifecycle::{
    FixedDepositStatus, MutualFundStatus, RecurringDepositStatus, TradableStatus,
};
use crate::mutual_funds::{InstallmentKind, MutualFund, NewInstallment};
use crate::recurring_deposits::{Frequency, RecurringDeposit};
use crate::settings::{EngineSettings, InterestMode, RdCompounding};
use crate::tradables::{Market, TradablePosition};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn created() -> NaiveDateTime {
    d(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()
}

fn fixed_deposit(amount: Decimal, rate: Decimal, start: NaiveDate, maturity: NaiveDate) -> FixedDeposit {
    FixedDeposit {
        id: 1,
        name: "SBI FD".to_string(),
        invested_amount: amount,
        interest_rate: rate,
        start_date: start,
        maturity_date: maturity,
        status: FixedDepositStatus::Ongoing,
        notes: None,
        created_at: created(),
    }
}

fn empty_fund() -> MutualFund {
    MutualFund {
        id: 7,
        name: "Index Fund".to_string(),
        scheme_code: Some("120716".to_string()),
        sip_amount: Some(dec!(5000)),
        start_date: d(2024, 1, 5),
        total_units: Decimal::ZERO,
        current_nav: dec!(50),
        last_nav_date: None,
        total_invested: Decimal::ZERO,
        status: MutualFundStatus::Ongoing,
        notes: None,
        created_at: created(),
        installments: Vec::new(),
    }
}

fn recurring_deposit(amount: Decimal, rate: Decimal, frequency: Frequency, total: u32) -> RecurringDeposit {
    RecurringDeposit {
        id: 3,
        name: "Post Office RD".to_string(),
        installment_amount: amount,
        frequency,
        interest_rate: rate,
        start_date: d(2024, 1, 10),
        total_installments: total,
        installments_paid: 0,
        last_paid_date: None,
        status: RecurringDepositStatus::Ongoing,
        notes: None,
        created_at: created(),
    }
}

fn position(market: Market) -> TradablePosition {
    TradablePosition {
        id: 11,
        name: "Infosys".to_string(),
        symbol: "INFY".to_string(),
        lookup_id: None,
        market,
        quantity: dec!(10),
        buy_price: dec!(1500),
        buy_date: d(2024, 2, 1),
        current_price: dec!(1650),
        status: TradableStatus::Holding,
        notes: None,
        created_at: created(),
    }
}

// ============================================================================
// returns_percent
// ============================================================================

#[test]
fn test_returns_percent_zero_when_nothing_invested() {
    assert_eq!(returns_percent(dec!(500), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(returns_percent(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
}

#[test]
fn test_returns_percent_rounds_to_four_places() {
    assert_eq!(returns_percent(dec!(110), dec!(100)), dec!(10));
    assert_eq!(returns_percent(dec!(90), dec!(100)), dec!(-10));
    assert_eq!(returns_percent(dec!(100), dec!(3)), dec!(3233.3333));
    assert_eq!(
        returns_percent(dec!(70000000000000000000000000000), dec!(0.0001)),
        Decimal::MAX
    );
}

// ============================================================================
// Fixed deposits
// ============================================================================

#[test]
fn test_fd_simple_interest_over_leap_year() {
    // 2024 is a leap year, so the term is 366 days.
    let fd = fixed_deposit(dec!(100000), dec!(7.5), d(2024, 1, 1), d(2025, 1, 1));
    let calc = FixedTermCalculator::new(InterestMode::Simple, 365);

    let expected = calc.expected_withdrawal(&fd);
    assert_eq!(expected, dec!(107520.547945));
    assert_eq!(expected.round_dp(2), dec!(107520.55));

    let deviation = ((expected - dec!(107500)) / dec!(107500)).abs();
    assert!(deviation < dec!(0.001), "deviation was {}", deviation);
}

#[test]
fn test_fd_simple_interest_exact_year() {
    let fd = fixed_deposit(dec!(100000), dec!(7.5), d(2023, 1, 1), d(2024, 1, 1));
    let calc = FixedTermCalculator::new(InterestMode::Simple, 365);
    assert_eq!(calc.expected_withdrawal(&fd), dec!(107500));
}

#[test]
fn test_fd_compound_quarterly_full_year() {
    let fd = fixed_deposit(dec!(100000), dec!(8), d(2023, 1, 1), d(2024, 1, 1));
    let calc = FixedTermCalculator::new(InterestMode::CompoundQuarterly, 365);
    // 100000 * 1.02^4
    assert_eq!(calc.expected_withdrawal(&fd), dec!(108243.216));
}

#[test]
fn test_fd_compound_yearly_with_partial_year() {
    // 365 + 73 days: one full year, then 73/365 of a year simple.
    let fd = fixed_deposit(dec!(1000), dec!(10), d(2023, 1, 1), d(2024, 3, 14));
    assert_eq!(fd.term_days(), 438);
    let calc = FixedTermCalculator::new(InterestMode::CompoundYearly, 365);
    // 1000 * 1.1 * (1 + 0.1 * 73 / 365) = 1100 * 1.02
    assert_eq!(calc.expected_withdrawal(&fd), dec!(1122));
}

#[test]
fn test_fd_current_value_by_lifecycle() {
    let calc = FixedTermCalculator::new(InterestMode::Simple, 365);
    let mut fd = fixed_deposit(dec!(100000), dec!(7.5), d(2023, 1, 1), d(2024, 1, 1));

    let before = calc.value(&fd, d(2023, 6, 30));
    assert_eq!(before.current_value, dec!(100000));
    assert_eq!(before.returns_percent, Decimal::ZERO);
    assert_eq!(before.projected_maturity, Some(dec!(107500)));

    let matured = calc.value(&fd, d(2024, 1, 1));
    assert_eq!(matured.current_value, dec!(107500));
    assert_eq!(matured.returns_percent, dec!(7.5));

    fd.status = FixedDepositStatus::Closed {
        actual_withdrawal: dec!(107000),
        closed_date: d(2024, 1, 3),
    };
    let closed = calc.value(&fd, d(2024, 2, 1));
    assert_eq!(closed.current_value, dec!(107000));
    assert_eq!(closed.invested, dec!(100000));
    assert_eq!(closed.returns_percent, dec!(7));
}

// ============================================================================
// Unit-based positions
// ============================================================================

#[test]
fn test_sip_two_installments_then_nav_update() {
    let mut fund = empty_fund();
    fund.apply_installment(NewInstallment {
        date: d(2024, 1, 5),
        amount: dec!(5000),
        nav_at_purchase: dec!(50),
        kind: InstallmentKind::Recurring,
    })
    .unwrap();
    fund.apply_installment(NewInstallment {
        date: d(2024, 2, 5),
        amount: dec!(5000),
        nav_at_purchase: dec!(40),
        kind: InstallmentKind::Recurring,
    })
    .unwrap();

    assert_eq!(fund.total_units, dec!(225));
    assert_eq!(fund.total_invested, dec!(10000));

    fund.update_nav(dec!(45), d(2024, 3, 1)).unwrap();
    let valuation = UnitBasedCalculator.value(&fund, d(2024, 3, 1));
    assert_eq!(valuation.current_value, dec!(10125));
    assert_eq!(valuation.returns_percent, dec!(1.25));
    assert_eq!(valuation.projected_maturity, None);
}

#[test]
fn test_sip_without_installments_has_zero_returns() {
    let valuation = UnitBasedCalculator.value(&empty_fund(), d(2024, 3, 1));
    assert_eq!(valuation.invested, Decimal::ZERO);
    assert_eq!(valuation.current_value, Decimal::ZERO);
    assert_eq!(valuation.returns_percent, Decimal::ZERO);
}

// ============================================================================
// Recurring deposits
// ============================================================================

#[test]
fn test_rd_per_installment_monthly_maturity() {
    let rd = recurring_deposit(dec!(1000), dec!(12), Frequency::Monthly, 12);
    let calc = InstallmentCalculator::new(RdCompounding::PerInstallment, 365);
    // 1000 * sum(1.01^k, k = 1..12)
    assert_eq!(calc.maturity_value(&rd).round_dp(2), dec!(12809.33));
}

#[test]
fn test_rd_zero_rate_matures_at_total_contribution() {
    let rd = recurring_deposit(dec!(5000), Decimal::ZERO, Frequency::Monthly, 12);
    let calc = InstallmentCalculator::new(RdCompounding::PerInstallment, 365);
    assert_eq!(calc.maturity_value(&rd), dec!(60000));

    let quarterly = InstallmentCalculator::new(RdCompounding::Quarterly, 365);
    assert_eq!(quarterly.maturity_value(&rd), dec!(60000));
}

#[test]
fn test_rd_quarterly_single_yearly_installment() {
    let rd = recurring_deposit(dec!(1000), dec!(8), Frequency::Yearly, 1);
    let calc = InstallmentCalculator::new(RdCompounding::Quarterly, 365);
    // Held one year: four full quarters at 2%.
    assert_eq!(calc.maturity_value(&rd), dec!(1082.43216));
}

#[test]
fn test_rd_schedule_beyond_limit_uses_contributions() {
    let rd = recurring_deposit(dec!(5000), dec!(7), Frequency::Monthly, 20_000);
    let calc = InstallmentCalculator::new(RdCompounding::PerInstallment, 365);
    assert_eq!(calc.maturity_value(&rd), dec!(100000000));

    let valuation = calc.value(&rd, d(2024, 6, 1));
    assert_eq!(valuation.projected_maturity, Some(dec!(100000000)));
}

#[test]
fn test_rd_overflowing_interest_does_not_panic() {
    let rd = recurring_deposit(dec!(5000), dec!(10000), Frequency::Monthly, 1_200);
    let per_installment = InstallmentCalculator::new(RdCompounding::PerInstallment, 365);
    assert_eq!(per_installment.maturity_value(&rd), dec!(6000000));

    let quarterly = InstallmentCalculator::new(RdCompounding::Quarterly, 365);
    assert!(quarterly.maturity_value(&rd) > dec!(6000000));
}

#[test]
fn test_fd_overflowing_maturity_is_carried_at_cost() {
    let principal = dec!(10000000000000000000000000);
    let fd = fixed_deposit(principal, dec!(1000000), d(2023, 1, 1), d(2024, 1, 1));
    let calc = FixedTermCalculator::new(InterestMode::Simple, 365);
    assert_eq!(calc.expected_withdrawal(&fd), principal);
}

#[test]
fn test_rd_maturity_ignores_payment_progress() {
    let calc = InstallmentCalculator::new(RdCompounding::PerInstallment, 365);
    let mut rd = recurring_deposit(dec!(1000), dec!(12), Frequency::Monthly, 12);
    let contracted = calc.maturity_value(&rd);

    rd.installments_paid = 5;
    assert_eq!(calc.maturity_value(&rd), contracted);
}

#[test]
fn test_rd_current_value_by_lifecycle() {
    let calc = InstallmentCalculator::new(RdCompounding::PerInstallment, 365);
    let mut rd = recurring_deposit(dec!(5000), dec!(6), Frequency::Monthly, 12);
    rd.installments_paid = 4;

    let ongoing = calc.value(&rd, d(2024, 5, 1));
    assert_eq!(ongoing.invested, dec!(20000));
    assert_eq!(ongoing.current_value, dec!(20000));

    rd.installments_paid = 12;
    rd.status = RecurringDepositStatus::Completed;
    let maturity_date = rd.maturity_date().unwrap();
    assert_eq!(maturity_date, d(2025, 1, 10));

    let before_maturity = calc.value(&rd, d(2024, 12, 20));
    assert_eq!(before_maturity.current_value, dec!(60000));

    let at_maturity = calc.value(&rd, maturity_date);
    assert_eq!(Some(at_maturity.current_value), at_maturity.projected_maturity);
    assert!(at_maturity.current_value > dec!(60000));

    rd.status = RecurringDepositStatus::Closed {
        actual_withdrawal: dec!(61900),
        closed_date: d(2025, 1, 12),
    };
    let closed = calc.value(&rd, d(2025, 2, 1));
    assert_eq!(closed.current_value, dec!(61900));
}

// ============================================================================
// Tradable positions
// ============================================================================

#[test]
fn test_tradable_marks_to_market() {
    let tp = position(Market::IndianEquity);
    let valuation = MarkToMarketCalculator.value(&tp, d(2024, 3, 1));
    assert_eq!(valuation.invested, dec!(15000));
    assert_eq!(valuation.current_value, dec!(16500));
    assert_eq!(valuation.returns_percent, dec!(10));
}

#[test]
fn test_tradable_sold_values_at_sale_price() {
    let mut tp = position(Market::UsEquity);
    tp.sell(dec!(1400), d(2024, 4, 1)).unwrap();
    // A stale price must not leak into the valuation of a sold position.
    tp.current_price = dec!(9999);
    let valuation = MarkToMarketCalculator.value(&tp, d(2024, 5, 1));
    assert_eq!(valuation.current_value, dec!(14000));
    assert_eq!(valuation.returns_percent, dec!(-6.6667));
}

// ============================================================================
// Engine dispatch
// ============================================================================

#[test]
fn test_engine_uses_configured_modes() {
    let settings = EngineSettings {
        fd_interest_mode: InterestMode::CompoundQuarterly,
        ..EngineSettings::default()
    };
    let engine = ValuationEngine::new(&settings);
    let fd = fixed_deposit(dec!(100000), dec!(8), d(2023, 1, 1), d(2024, 1, 1));

    let detail = engine.detail(InstrumentRecord::FixedDeposit(fd), d(2024, 1, 1));
    assert_eq!(detail.status, "ONGOING");
    assert_eq!(detail.valuation.current_value, dec!(108243.216));
}

#[test]
fn test_engine_dispatches_every_class() {
    let engine = ValuationEngine::default();
    let as_of = d(2024, 3, 1);
    let records = vec![
        InstrumentRecord::FixedDeposit(fixed_deposit(
            dec!(1000),
            dec!(7),
            d(2024, 1, 1),
            d(2025, 1, 1),
        )),
        InstrumentRecord::MutualFund(empty_fund()),
        InstrumentRecord::RecurringDeposit(recurring_deposit(
            dec!(100),
            dec!(6),
            Frequency::Custom { days: 30 },
            6,
        )),
        InstrumentRecord::Tradable(position(Market::Crypto)),
    ];

    let values: Vec<Decimal> = records
        .iter()
        .map(|r| engine.value(r, as_of).current_value)
        .collect();
    assert_eq!(values, vec![dec!(1000), dec!(0), dec!(0), dec!(16500)]);
}
