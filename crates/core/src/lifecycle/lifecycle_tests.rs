//! Tests for the per-class lifecycle transitions.

use super::*;
use crate::instruments::InstrumentClass;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_fixed_deposit_close_is_terminal() {
    let ongoing = FixedDepositStatus::Ongoing;
    let closed = ongoing.close(dec!(107500), date(2025, 1, 1)).unwrap();

    assert!(closed.is_terminal());
    assert_eq!(closed.actual_withdrawal(), Some(dec!(107500)));
    assert_eq!(closed.closed_date(), Some(date(2025, 1, 1)));
    assert_eq!(ongoing.actual_withdrawal(), None);

    let err = closed.close(dec!(1), date(2025, 2, 1)).unwrap_err();
    assert_eq!(err.class, InstrumentClass::FixedDeposit);
    assert_eq!(err.from, "CLOSED");
    assert_eq!(err.operation, LifecycleOperation::Close);
}

#[test]
fn test_fixed_deposit_amend_only_from_closed() {
    let ongoing = FixedDepositStatus::Ongoing;
    assert!(ongoing.amend_closure(dec!(100), date(2025, 1, 1)).is_err());

    let closed = ongoing.close(dec!(100), date(2025, 1, 1)).unwrap();
    let amended = closed.amend_closure(dec!(120), date(2025, 1, 3)).unwrap();
    assert_eq!(amended.actual_withdrawal(), Some(dec!(120)));
    assert_eq!(amended.closed_date(), Some(date(2025, 1, 3)));
}

#[test]
fn test_mutual_fund_pause_resume_cycle() {
    let ongoing = MutualFundStatus::Ongoing;
    let paused = ongoing.pause().unwrap();
    assert_eq!(paused, MutualFundStatus::Paused);
    assert!(paused.pause().is_err());
    assert_eq!(paused.resume().unwrap(), MutualFundStatus::Ongoing);
    assert!(ongoing.resume().is_err());

    assert_eq!(ongoing.toggle_pause().unwrap(), MutualFundStatus::Paused);
    assert_eq!(paused.toggle_pause().unwrap(), MutualFundStatus::Ongoing);
}

#[test]
fn test_mutual_fund_redeem_forbids_further_mutation() {
    let redeemed = MutualFundStatus::Paused
        .redeem(dec!(12000), date(2025, 6, 1))
        .unwrap();
    assert!(redeemed.is_terminal());
    assert!(redeemed.redeem(dec!(1), date(2025, 6, 2)).is_err());
    assert!(redeemed.pause().is_err());
    assert!(redeemed.resume().is_err());
    assert!(redeemed.toggle_pause().is_err());
    assert!(redeemed.ensure_accepts_installment(false).is_err());
    assert!(redeemed.ensure_accepts_installment(true).is_err());
    assert!(redeemed.ensure_accepts_nav_update().is_err());
    assert!(redeemed.ensure_editable().is_err());
}

#[test]
fn test_paused_fund_accepts_only_lumpsum() {
    let paused = MutualFundStatus::Paused;
    assert!(paused.ensure_accepts_installment(false).is_ok());
    let err = paused.ensure_accepts_installment(true).unwrap_err();
    assert_eq!(err.operation, LifecycleOperation::ApplyInstallment);
    assert!(MutualFundStatus::Ongoing.ensure_accepts_installment(true).is_ok());
}

#[test]
fn test_recurring_deposit_completes_on_last_installment() {
    let mut status = RecurringDepositStatus::Ongoing;
    let mut paid = 0;
    for _ in 0..12 {
        let (next, next_paid) = status.mark_installment_paid(paid, 12).unwrap();
        status = next;
        paid = next_paid;
    }
    assert_eq!(paid, 12);
    assert_eq!(status, RecurringDepositStatus::Completed);

    let err = status.mark_installment_paid(paid, 12).unwrap_err();
    assert_eq!(err.from, "COMPLETED");

    let closed = status.close(dec!(62000), date(2025, 12, 1)).unwrap();
    assert!(closed.is_terminal());
    assert!(closed.mark_installment_paid(paid, 12).is_err());
    assert!(closed.close(dec!(62000), date(2025, 12, 1)).is_err());
}

#[test]
fn test_recurring_deposit_can_close_directly_from_ongoing() {
    let closed = RecurringDepositStatus::Ongoing
        .close(dec!(15000), date(2024, 9, 1))
        .unwrap();
    assert_eq!(closed.actual_withdrawal(), Some(dec!(15000)));
    assert_eq!(closed.label(), "CLOSED");
}

#[test]
fn test_tradable_sell_is_irreversible() {
    let sold = TradableStatus::Holding.sell(dec!(250), date(2024, 3, 1)).unwrap();
    assert!(sold.is_terminal());
    let err = sold.sell(dec!(260), date(2024, 3, 2)).unwrap_err();
    assert_eq!(err.to_string(), "cannot sell a tradable position in state SOLD");
}

#[test]
fn test_status_serialization_carries_terminal_data() {
    let closed = FixedDepositStatus::Closed {
        actual_withdrawal: dec!(100),
        closed_date: date(2025, 1, 1),
    };
    let json = serde_json::to_value(&closed).unwrap();
    assert_eq!(json["status"], "CLOSED");
    assert_eq!(json["closedDate"], "2025-01-01");

    let paused: MutualFundStatus = serde_json::from_str(r#"{"status":"PAUSED"}"#).unwrap();
    assert_eq!(paused, MutualFundStatus::Paused);
}
