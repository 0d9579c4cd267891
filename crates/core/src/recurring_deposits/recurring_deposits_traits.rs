//! Repository and service traits for recurring deposits.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::recurring_deposits_model::{
    NewRecurringDeposit, RecurringDeposit, RecurringDepositUpdate,
};
use crate::errors::Result;
use crate::instruments::InstrumentDetail;

#[async_trait]
pub trait RecurringDepositRepositoryTrait: Send + Sync {
    fn get_by_id(&self, deposit_id: i64) -> Result<RecurringDeposit>;
    fn list(&self) -> Result<Vec<RecurringDeposit>>;
    async fn create(&self, new_deposit: NewRecurringDeposit) -> Result<RecurringDeposit>;
    async fn update(&self, deposit: RecurringDeposit) -> Result<RecurringDeposit>;
    async fn delete(&self, deposit_id: i64) -> Result<usize>;
}

#[async_trait]
pub trait RecurringDepositServiceTrait: Send + Sync {
    fn get_recurring_deposit(&self, deposit_id: i64) -> Result<InstrumentDetail>;
    fn list_recurring_deposits(&self) -> Result<Vec<InstrumentDetail>>;
    async fn create_recurring_deposit(
        &self,
        new_deposit: NewRecurringDeposit,
    ) -> Result<InstrumentDetail>;
    async fn update_recurring_deposit(
        &self,
        update: RecurringDepositUpdate,
    ) -> Result<InstrumentDetail>;
    async fn delete_recurring_deposit(&self, deposit_id: i64) -> Result<usize>;
    /// Marks the next due installment as paid. Paying the last one completes the deposit.
    async fn mark_installment_paid(
        &self,
        deposit_id: i64,
        paid_date: NaiveDate,
    ) -> Result<InstrumentDetail>;
    async fn close_recurring_deposit(
        &self,
        deposit_id: i64,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<InstrumentDetail>;
}
