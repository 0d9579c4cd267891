//! Repository and service traits for unit-based positions.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::mutual_funds_model::{
    Installment, MutualFund, MutualFundUpdate, NewInstallment, NewMutualFund,
};
use crate::errors::Result;
use crate::instruments::InstrumentDetail;

/// Ledger store operations for unit-based positions and their installment ledger.
#[async_trait]
pub trait MutualFundRepositoryTrait: Send + Sync {
    /// Loads the position together with its installment ledger.
    fn get_by_id(&self, fund_id: i64) -> Result<MutualFund>;
    fn list(&self) -> Result<Vec<MutualFund>>;
    async fn create(&self, new_fund: NewMutualFund) -> Result<MutualFund>;
    /// Persists header fields (name, NAV, status, totals). Installments are untouched.
    async fn update(&self, fund: MutualFund) -> Result<MutualFund>;
    /// Appends one ledger entry and stores the fund's new totals in a single transaction.
    async fn append_installment(
        &self,
        fund: MutualFund,
        installment: Installment,
    ) -> Result<MutualFund>;
    async fn delete(&self, fund_id: i64) -> Result<usize>;
}

#[async_trait]
pub trait MutualFundServiceTrait: Send + Sync {
    fn get_mutual_fund(&self, fund_id: i64) -> Result<InstrumentDetail>;
    fn list_mutual_funds(&self) -> Result<Vec<InstrumentDetail>>;
    async fn create_mutual_fund(&self, new_fund: NewMutualFund) -> Result<InstrumentDetail>;
    async fn update_mutual_fund(&self, update: MutualFundUpdate) -> Result<InstrumentDetail>;
    async fn delete_mutual_fund(&self, fund_id: i64) -> Result<usize>;
    async fn apply_installment(
        &self,
        fund_id: i64,
        installment: NewInstallment,
    ) -> Result<InstrumentDetail>;
    /// Toggles between ongoing and paused.
    async fn pause_resume(&self, fund_id: i64) -> Result<InstrumentDetail>;
    async fn redeem(
        &self,
        fund_id: i64,
        redeemed_amount: Decimal,
        redeemed_date: NaiveDate,
    ) -> Result<InstrumentDetail>;
    async fn update_nav(
        &self,
        fund_id: i64,
        nav: Decimal,
        nav_date: NaiveDate,
    ) -> Result<InstrumentDetail>;
}
