//! Repository and service traits for the portfolio rollup and balances.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::balances_model::{
    CashAccount, NewCashAccount, NewOtherAsset, NewSavingsGoal, OtherAsset, SavingsGoal,
};
use super::rollup_model::{PortfolioRollup, PortfolioSnapshot};
use crate::errors::Result;
use crate::instruments::{InstrumentClass, InstrumentDetail, InstrumentRecord, InstrumentSummary};

/// Ledger store operations for cash accounts, other assets and savings goals.
#[async_trait]
pub trait BalancesRepositoryTrait: Send + Sync {
    fn list_cash_accounts(&self) -> Result<Vec<CashAccount>>;
    async fn create_cash_account(&self, new_account: NewCashAccount) -> Result<CashAccount>;
    async fn update_cash_account(&self, account: CashAccount) -> Result<CashAccount>;
    async fn delete_cash_account(&self, account_id: i64) -> Result<usize>;

    fn list_other_assets(&self) -> Result<Vec<OtherAsset>>;
    async fn create_other_asset(&self, new_asset: NewOtherAsset) -> Result<OtherAsset>;
    async fn update_other_asset(&self, asset: OtherAsset) -> Result<OtherAsset>;
    async fn delete_other_asset(&self, asset_id: i64) -> Result<usize>;

    fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>>;
    async fn create_savings_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_savings_goal(&self, goal: SavingsGoal) -> Result<SavingsGoal>;
    async fn delete_savings_goal(&self, goal_id: i64) -> Result<usize>;
}

/// Cross-class reads that must see one consistent state of the ledger.
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Every instrument and balance, read within a single transaction.
    fn load_snapshot(&self) -> Result<PortfolioSnapshot>;
    fn get_instrument(&self, class: InstrumentClass, instrument_id: i64) -> Result<InstrumentRecord>;
}

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_instrument_summary(
        &self,
        class: InstrumentClass,
        as_of: NaiveDate,
    ) -> Result<InstrumentSummary>;
    /// One summary per class, in class order.
    fn get_instrument_summaries(&self, as_of: NaiveDate) -> Result<Vec<InstrumentSummary>>;
    fn get_instrument_detail(
        &self,
        class: InstrumentClass,
        instrument_id: i64,
        as_of: NaiveDate,
    ) -> Result<InstrumentDetail>;
    /// Closes a deposit or redeems a fund. Tradable positions are sold through their own service.
    async fn redeem_or_close(
        &self,
        class: InstrumentClass,
        instrument_id: i64,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<InstrumentDetail>;
    fn rollup_portfolio(&self, as_of: NaiveDate) -> Result<PortfolioRollup>;
}

#[async_trait]
pub trait BalancesServiceTrait: Send + Sync {
    fn list_cash_accounts(&self) -> Result<Vec<CashAccount>>;
    async fn create_cash_account(&self, new_account: NewCashAccount) -> Result<CashAccount>;
    async fn update_cash_account(&self, account: CashAccount) -> Result<CashAccount>;
    async fn delete_cash_account(&self, account_id: i64) -> Result<usize>;

    fn list_other_assets(&self) -> Result<Vec<OtherAsset>>;
    async fn create_other_asset(&self, new_asset: NewOtherAsset) -> Result<OtherAsset>;
    async fn update_other_asset(&self, asset: OtherAsset) -> Result<OtherAsset>;
    async fn delete_other_asset(&self, asset_id: i64) -> Result<usize>;

    fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>>;
    async fn create_savings_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_savings_goal(&self, goal: SavingsGoal) -> Result<SavingsGoal>;
    async fn delete_savings_goal(&self, goal_id: i64) -> Result<usize>;
}
