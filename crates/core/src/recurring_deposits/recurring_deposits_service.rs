use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::recurring_deposits_model::{
    NewRecurringDeposit, RecurringDeposit, RecurringDepositUpdate,
};
use super::recurring_deposits_traits::{
    RecurringDepositRepositoryTrait, RecurringDepositServiceTrait,
};
use crate::errors::{ensure_positive, Result};
use crate::instruments::{InstrumentDetail, InstrumentRecord};
use crate::lifecycle::{LifecycleState, RecurringDepositStatus};
use crate::settings::SettingsServiceTrait;
use crate::utils::valuation_date_today;
use crate::valuation::ValuationEngine;

pub struct RecurringDepositService {
    repository: Arc<dyn RecurringDepositRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl RecurringDepositService {
    pub fn new(
        repository: Arc<dyn RecurringDepositRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            repository,
            settings_service,
        }
    }

    fn to_detail(&self, deposit: RecurringDeposit) -> Result<InstrumentDetail> {
        let engine = ValuationEngine::new(&self.settings_service.get_engine_settings()?);
        Ok(engine.detail(
            InstrumentRecord::RecurringDeposit(deposit),
            valuation_date_today(),
        ))
    }
}

#[async_trait]
impl RecurringDepositServiceTrait for RecurringDepositService {
    fn get_recurring_deposit(&self, deposit_id: i64) -> Result<InstrumentDetail> {
        self.to_detail(self.repository.get_by_id(deposit_id)?)
    }

    fn list_recurring_deposits(&self) -> Result<Vec<InstrumentDetail>> {
        self.repository
            .list()?
            .into_iter()
            .map(|deposit| self.to_detail(deposit))
            .collect()
    }

    async fn create_recurring_deposit(
        &self,
        new_deposit: NewRecurringDeposit,
    ) -> Result<InstrumentDetail> {
        new_deposit.validate()?;
        let created = self.repository.create(new_deposit).await?;
        debug!(
            "Created recurring deposit {} ({}), {} of {} installments paid",
            created.id, created.name, created.installments_paid, created.total_installments
        );
        self.to_detail(created)
    }

    async fn update_recurring_deposit(
        &self,
        update: RecurringDepositUpdate,
    ) -> Result<InstrumentDetail> {
        update.validate()?;
        let mut deposit = self.repository.get_by_id(update.id)?;
        deposit.status.ensure_editable()?;
        update.apply_to(&mut deposit);
        let saved = self.repository.update(deposit).await?;
        self.to_detail(saved)
    }

    async fn delete_recurring_deposit(&self, deposit_id: i64) -> Result<usize> {
        self.repository.delete(deposit_id).await
    }

    async fn mark_installment_paid(
        &self,
        deposit_id: i64,
        paid_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        let mut deposit = self.repository.get_by_id(deposit_id)?;
        deposit.mark_installment_paid(paid_date)?;
        if deposit.status == RecurringDepositStatus::Completed {
            debug!("Recurring deposit {} completed", deposit_id);
        }
        let saved = self.repository.update(deposit).await?;
        self.to_detail(saved)
    }

    async fn close_recurring_deposit(
        &self,
        deposit_id: i64,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        ensure_positive("actualWithdrawal", actual_withdrawal)?;
        let mut deposit = self.repository.get_by_id(deposit_id)?;
        deposit.status = deposit.status.close(actual_withdrawal, closed_date)?;
        debug!(
            "Closing recurring deposit {} on {} with withdrawal {}",
            deposit_id, closed_date, actual_withdrawal
        );
        let saved = self.repository.update(deposit).await?;
        self.to_detail(saved)
    }
}
