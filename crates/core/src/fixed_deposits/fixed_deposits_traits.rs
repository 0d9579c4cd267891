//! Repository and service traits for fixed deposits.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::fixed_deposits_model::{
    ClosureAmendment, FixedDeposit, FixedDepositUpdate, NewFixedDeposit,
};
use crate::errors::Result;
use crate::instruments::InstrumentDetail;

/// Ledger store operations for fixed deposits.
#[async_trait]
pub trait FixedDepositRepositoryTrait: Send + Sync {
    fn get_by_id(&self, deposit_id: i64) -> Result<FixedDeposit>;
    fn list(&self) -> Result<Vec<FixedDeposit>>;
    async fn create(&self, new_deposit: NewFixedDeposit) -> Result<FixedDeposit>;
    /// Persists the full record, including its status.
    async fn update(&self, deposit: FixedDeposit) -> Result<FixedDeposit>;
    async fn delete(&self, deposit_id: i64) -> Result<usize>;
}

#[async_trait]
pub trait FixedDepositServiceTrait: Send + Sync {
    fn get_fixed_deposit(&self, deposit_id: i64) -> Result<InstrumentDetail>;
    fn list_fixed_deposits(&self) -> Result<Vec<InstrumentDetail>>;
    async fn create_fixed_deposit(&self, new_deposit: NewFixedDeposit) -> Result<InstrumentDetail>;
    async fn update_fixed_deposit(&self, update: FixedDepositUpdate) -> Result<InstrumentDetail>;
    async fn delete_fixed_deposit(&self, deposit_id: i64) -> Result<usize>;
    async fn close_fixed_deposit(
        &self,
        deposit_id: i64,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<InstrumentDetail>;
    /// Corrects withdrawal amount, date or notes of a closed deposit.
    async fn amend_closed_fixed_deposit(
        &self,
        deposit_id: i64,
        amendment: ClosureAmendment,
    ) -> Result<InstrumentDetail>;
}
