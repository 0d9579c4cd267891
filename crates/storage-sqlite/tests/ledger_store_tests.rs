//! Integration tests against a real SQLite file with the embedded migrations applied.

use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use wealthledger_core::errors::{DatabaseError, Error};
use wealthledger_core::fixed_deposits::{
    FixedDepositRepositoryTrait, FixedDepositService, FixedDepositServiceTrait, FixedDepositUpdate,
    NewFixedDeposit,
};
use wealthledger_core::instruments::{Currency, InstrumentClass, InstrumentRecord};
use wealthledger_core::lifecycle::{
    FixedDepositStatus, MutualFundStatus, RecurringDepositStatus, TradableStatus,
};
use wealthledger_core::mutual_funds::{
    InstallmentKind, MutualFundRepositoryTrait, MutualFundService, MutualFundServiceTrait,
    NewInstallment, NewMutualFund,
};
use wealthledger_core::portfolio::{
    BalancesRepositoryTrait, NewCashAccount, NewOtherAsset, NewSavingsGoal,
    PortfolioRepositoryTrait,
};
use wealthledger_core::recurring_deposits::{
    Frequency, NewRecurringDeposit, RecurringDepositRepositoryTrait, RecurringDepositService,
    RecurringDepositServiceTrait,
};
use wealthledger_core::settings::{
    InterestMode, SettingsRepositoryTrait, SettingsService, SettingsServiceTrait,
    DEFAULT_PRICE_REFRESH_DELAY_MS,
};
use wealthledger_core::spending::{
    BucketFilter, ExpenseRepositoryTrait, NewExpense, NewExpenseTag, SpendingService,
    SpendingServiceTrait,
};
use wealthledger_core::tradables::{
    Market, NewTradablePosition, TradableRepositoryTrait, TradableService, TradableServiceTrait,
};
use wealthledger_storage_sqlite::{
    get_connection, open, BalancesRepository, DbPool, ExpenseRepository, FixedDepositRepository,
    MutualFundRepository, PortfolioRepository, RecurringDepositRepository, SettingsRepository,
    TradableRepository, WriteHandle,
};

struct TestStore {
    _dir: TempDir,
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn store() -> TestStore {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ledger.db");
    let (pool, writer) = open(db_path.to_str().unwrap()).unwrap();
    TestStore {
        _dir: dir,
        pool,
        writer,
    }
}

impl TestStore {
    fn settings(&self) -> Arc<SettingsService> {
        Arc::new(SettingsService::new(Arc::new(SettingsRepository::new(
            self.pool.clone(),
            self.writer.clone(),
        ))))
    }

    fn raw_sql(&self, sql: &str) {
        let mut conn = get_connection(&self.pool).unwrap();
        diesel::sql_query(sql).execute(&mut conn).unwrap();
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[tokio::test]
async fn test_fixed_deposit_closure_persists() {
    let store = store();
    let repo = Arc::new(FixedDepositRepository::new(
        store.pool.clone(),
        store.writer.clone(),
    ));
    let service = FixedDepositService::new(repo.clone(), store.settings());

    let created = service
        .create_fixed_deposit(NewFixedDeposit {
            name: "SBI FD".to_string(),
            invested_amount: dec!(100000),
            interest_rate: dec!(7.5),
            start_date: d(2023, 1, 1),
            maturity_date: d(2024, 1, 1),
            notes: Some("auto-renew off".to_string()),
        })
        .await
        .unwrap();
    let id = created.record.id();
    assert_eq!(created.valuation.projected_maturity, Some(dec!(107500)));

    service
        .close_fixed_deposit(id, dec!(107350.25), d(2024, 1, 2))
        .await
        .unwrap();

    let stored = repo.get_by_id(id).unwrap();
    assert_eq!(
        stored.status,
        FixedDepositStatus::Closed {
            actual_withdrawal: dec!(107350.25),
            closed_date: d(2024, 1, 2),
        }
    );
    assert_eq!(stored.notes.as_deref(), Some("auto-renew off"));

    let err = service
        .update_fixed_deposit(FixedDepositUpdate {
            id,
            name: "Renamed".to_string(),
            interest_rate: dec!(8),
            start_date: d(2023, 1, 1),
            maturity_date: d(2024, 1, 1),
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_state_transition());
    assert_eq!(repo.get_by_id(id).unwrap().name, "SBI FD");
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let store = store();
    let repo = FixedDepositRepository::new(store.pool.clone(), store.writer.clone());
    assert!(matches!(
        repo.get_by_id(42),
        Err(Error::Database(DatabaseError::NotFound(_)))
    ));
    assert_eq!(repo.delete(42).await.unwrap(), 0);
}

#[tokio::test]
async fn test_inconsistent_status_row_is_internal_error() {
    let store = store();
    store.raw_sql(
        "INSERT INTO fixed_deposits (id, name, invested_amount, interest_rate, start_date, \
         maturity_date, status, actual_withdrawal, closed_date, created_at) \
         VALUES (7, 'Broken', '1000', '7', '2023-01-01', '2024-01-01', 'CLOSED', NULL, NULL, \
         '2023-01-01 00:00:00')",
    );
    let repo = FixedDepositRepository::new(store.pool.clone(), store.writer.clone());

    assert!(matches!(
        repo.get_by_id(7),
        Err(Error::Database(DatabaseError::Internal(_)))
    ));
    let portfolio = PortfolioRepository::new(store.pool.clone());
    assert!(matches!(
        portfolio.load_snapshot(),
        Err(Error::Database(DatabaseError::Internal(_)))
    ));
}

#[tokio::test]
async fn test_installments_and_totals_written_together() {
    let store = store();
    let repo = Arc::new(MutualFundRepository::new(
        store.pool.clone(),
        store.writer.clone(),
    ));
    let service = MutualFundService::new(repo.clone(), store.settings());

    let id = service
        .create_mutual_fund(NewMutualFund {
            name: "Parag Parikh Flexi Cap".to_string(),
            scheme_code: Some("122639".to_string()),
            sip_amount: Some(dec!(5000)),
            start_date: d(2024, 1, 5),
            current_nav: dec!(45),
            notes: None,
        })
        .await
        .unwrap()
        .record
        .id();

    for (date, amount, nav, kind) in [
        (d(2024, 2, 5), dec!(5000), dec!(50), InstallmentKind::Recurring),
        (d(2024, 1, 5), dec!(10000), dec!(40), InstallmentKind::Lumpsum),
    ] {
        service
            .apply_installment(
                id,
                NewInstallment {
                    date,
                    amount,
                    nav_at_purchase: nav,
                    kind,
                },
            )
            .await
            .unwrap();
    }

    let fund = repo.get_by_id(id).unwrap();
    assert_eq!(fund.installments.len(), 2);
    assert_eq!(fund.installments[0].date, d(2024, 1, 5));
    assert_eq!(fund.installments[0].kind, InstallmentKind::Lumpsum);
    assert_eq!(fund.total_units, dec!(350));
    assert_eq!(fund.total_invested, dec!(15000));
    assert_eq!(fund.ledger_totals(), (fund.total_units, fund.total_invested));

    let paused = service.pause_resume(id).await.unwrap();
    assert_eq!(paused.status, "PAUSED");
    let err = service
        .apply_installment(
            id,
            NewInstallment {
                date: d(2024, 3, 5),
                amount: dec!(5000),
                nav_at_purchase: dec!(52),
                kind: InstallmentKind::Recurring,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_state_transition());
    assert_eq!(repo.get_by_id(id).unwrap().installments.len(), 2);

    service.redeem(id, dec!(18000), d(2024, 6, 1)).await.unwrap();
    assert_eq!(
        repo.get_by_id(id).unwrap().status,
        MutualFundStatus::Redeemed {
            redeemed_amount: dec!(18000),
            redeemed_date: d(2024, 6, 1),
        }
    );

    assert_eq!(repo.delete(id).await.unwrap(), 1);
    assert!(repo.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_recurring_deposit_custom_frequency_and_completion() {
    let store = store();
    let repo = Arc::new(RecurringDepositRepository::new(
        store.pool.clone(),
        store.writer.clone(),
    ));
    let service = RecurringDepositService::new(repo.clone(), store.settings());

    let id = service
        .create_recurring_deposit(NewRecurringDeposit {
            name: "Post office RD".to_string(),
            installment_amount: dec!(2000),
            frequency: Frequency::Custom { days: 14 },
            interest_rate: dec!(6.7),
            start_date: d(2024, 1, 1),
            total_installments: 2,
            installments_paid: 1,
            notes: None,
        })
        .await
        .unwrap()
        .record
        .id();

    service
        .mark_installment_paid(id, d(2024, 1, 15))
        .await
        .unwrap();

    let stored = repo.get_by_id(id).unwrap();
    assert_eq!(stored.frequency, Frequency::Custom { days: 14 });
    assert_eq!(stored.installments_paid, 2);
    assert_eq!(stored.last_paid_date, Some(d(2024, 1, 15)));
    assert_eq!(stored.status, RecurringDepositStatus::Completed);

    service
        .close_recurring_deposit(id, dec!(4010), d(2024, 2, 1))
        .await
        .unwrap();
    assert_eq!(
        repo.get_by_id(id).unwrap().status.actual_withdrawal(),
        Some(dec!(4010))
    );
}

#[tokio::test]
async fn test_recurring_deposit_count_too_wide_for_column_is_rejected() {
    let store = store();
    let repo = RecurringDepositRepository::new(store.pool.clone(), store.writer.clone());

    let oversized = NewRecurringDeposit {
        name: "Runaway RD".to_string(),
        installment_amount: dec!(100),
        frequency: Frequency::Monthly,
        interest_rate: dec!(7),
        start_date: d(2024, 1, 1),
        total_installments: 3_000_000_000,
        installments_paid: 0,
        notes: None,
    };
    let err = repo.create(oversized).await.unwrap_err();
    assert!(err.is_validation(), "unexpected error: {err:?}");
    assert!(repo.list().unwrap().is_empty());

    let created = repo
        .create(NewRecurringDeposit {
            name: "Monthly RD".to_string(),
            installment_amount: dec!(100),
            frequency: Frequency::Custom { days: 30 },
            interest_rate: dec!(7),
            start_date: d(2024, 1, 1),
            total_installments: 12,
            installments_paid: 0,
            notes: None,
        })
        .await
        .unwrap();
    let mut widened = created.clone();
    widened.frequency = Frequency::Custom { days: u32::MAX };
    let err = repo.update(widened).await.unwrap_err();
    assert!(err.is_validation(), "unexpected error: {err:?}");
    assert_eq!(
        repo.get_by_id(created.id).unwrap().frequency,
        Frequency::Custom { days: 30 }
    );
}

#[tokio::test]
async fn test_tradable_defaults_price_and_records_sale() {
    let store = store();
    let repo = Arc::new(TradableRepository::new(
        store.pool.clone(),
        store.writer.clone(),
    ));
    let service = TradableService::new(repo.clone());

    let detail = service
        .create_position(NewTradablePosition {
            name: "Apple".to_string(),
            symbol: "AAPL".to_string(),
            lookup_id: None,
            market: Market::UsEquity,
            quantity: dec!(3),
            buy_price: dec!(180.5),
            buy_date: d(2024, 1, 10),
            current_price: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(detail.currency, Currency::Usd);
    let id = detail.record.id();
    assert_eq!(repo.get_by_id(id).unwrap().current_price, dec!(180.5));

    service.sell(id, dec!(210), d(2024, 5, 1)).await.unwrap();
    let sold = repo.get_by_id(id).unwrap();
    assert_eq!(
        sold.status,
        TradableStatus::Sold {
            sell_price: dec!(210),
            sell_date: d(2024, 5, 1),
        }
    );
    assert_eq!(sold.market, Market::UsEquity);
}

#[tokio::test]
async fn test_expense_snapshot_order_and_tag_deletion() {
    let store = store();
    let repo = Arc::new(ExpenseRepository::new(store.pool.clone(), store.writer.clone()));
    let service = SpendingService::new(repo.clone());

    let food = repo
        .create_tag(NewExpenseTag {
            name: "Food".to_string(),
            color: Some("#f97316".to_string()),
        })
        .await
        .unwrap();
    let reimbursable = repo
        .create_tag(NewExpenseTag {
            name: "Reimbursable".to_string(),
            color: None,
        })
        .await
        .unwrap();

    for (amount, date, exclusions) in [
        (dec!(300), d(2024, 3, 2), vec![reimbursable.id, reimbursable.id]),
        (dec!(120.5), d(2024, 3, 1), vec![]),
        (dec!(80), d(2024, 3, 2), vec![]),
    ] {
        repo.create_expense(NewExpense {
            amount,
            date,
            category_tag_id: Some(food.id),
            exclusion_tag_ids: exclusions,
            description: None,
        })
        .await
        .unwrap();
    }

    let snapshot = repo.load_snapshot().unwrap();
    let amounts: Vec<Decimal> = snapshot.expenses.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![dec!(120.5), dec!(300), dec!(80)]);
    assert_eq!(snapshot.expenses[1].exclusion_tag_ids, vec![reimbursable.id]);

    let filtered = service
        .get_spending_summary(&BucketFilter::excluding([reimbursable.id]))
        .unwrap();
    assert_eq!(filtered.total_spending, dec!(200.5));

    repo.delete_tag(food.id).await.unwrap();
    let summary = service.get_spending_summary(&BucketFilter::default()).unwrap();
    assert_eq!(summary.by_category.len(), 1);
    assert_eq!(summary.by_category[0].category_name, "Unknown");
    assert_eq!(summary.total_spending, dec!(500.5));

    let duplicate = repo
        .create_tag(NewExpenseTag {
            name: "Reimbursable".to_string(),
            color: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        duplicate,
        Error::Database(DatabaseError::UniqueViolation(_))
    ));
}

#[tokio::test]
async fn test_portfolio_snapshot_reads_every_table() {
    let store = store();
    let balances = BalancesRepository::new(store.pool.clone(), store.writer.clone());
    let deposits = FixedDepositRepository::new(store.pool.clone(), store.writer.clone());

    deposits
        .create(NewFixedDeposit {
            name: "HDFC FD".to_string(),
            invested_amount: dec!(50000),
            interest_rate: dec!(7),
            start_date: d(2024, 1, 1),
            maturity_date: d(2025, 1, 1),
            notes: None,
        })
        .await
        .unwrap();
    balances
        .create_cash_account(NewCashAccount {
            name: "Schwab".to_string(),
            balance: dec!(1200),
            currency: Currency::Usd,
        })
        .await
        .unwrap();
    balances
        .create_other_asset(NewOtherAsset {
            name: "Gold".to_string(),
            value: dec!(20000),
        })
        .await
        .unwrap();
    let mut goal = balances
        .create_savings_goal(NewSavingsGoal {
            name: "Emergency fund".to_string(),
            target_amount: dec!(300000),
            saved_amount: dec!(50000),
        })
        .await
        .unwrap();
    goal.saved_amount = dec!(75000);
    balances.update_savings_goal(goal).await.unwrap();

    let portfolio = PortfolioRepository::new(store.pool.clone());
    let snapshot = portfolio.load_snapshot().unwrap();
    assert_eq!(snapshot.instruments.len(), 1);
    assert_eq!(snapshot.cash_accounts[0].currency, Currency::Usd);
    assert_eq!(snapshot.other_assets[0].value, dec!(20000));
    assert_eq!(snapshot.savings_goals[0].saved_amount, dec!(75000));

    let id = snapshot.instruments[0].id();
    match portfolio.get_instrument(InstrumentClass::FixedDeposit, id).unwrap() {
        InstrumentRecord::FixedDeposit(fd) => assert_eq!(fd.invested_amount, dec!(50000)),
        other => panic!("unexpected record {:?}", other),
    }
    assert!(portfolio
        .get_instrument(InstrumentClass::MutualFund, id)
        .is_err());
}

#[tokio::test]
async fn test_settings_round_trip_and_fallback() {
    let store = store();
    let repo = SettingsRepository::new(store.pool.clone(), store.writer.clone());
    repo.update_setting("fd_interest_mode", "compound_quarterly")
        .await
        .unwrap();
    repo.update_setting("price_refresh_delay_ms", "soon")
        .await
        .unwrap();
    repo.update_setting("fd_interest_mode", "compound_yearly")
        .await
        .unwrap();

    assert_eq!(repo.get_all_settings().unwrap().len(), 2);
    assert_eq!(repo.get_setting("fd_interest_mode").unwrap(), "compound_yearly");
    assert!(matches!(
        repo.get_setting("theme"),
        Err(Error::Database(DatabaseError::NotFound(_)))
    ));

    let settings = store.settings().get_engine_settings().unwrap();
    assert_eq!(settings.fd_interest_mode, InterestMode::CompoundYearly);
    assert_eq!(settings.price_refresh_delay_ms, DEFAULT_PRICE_REFRESH_DELAY_MS);
}
