use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::fixed_deposits_model::{
    ClosureAmendment, FixedDeposit, FixedDepositUpdate, NewFixedDeposit,
};
use super::fixed_deposits_traits::{FixedDepositRepositoryTrait, FixedDepositServiceTrait};
use crate::errors::{ensure_positive, Result};
use crate::instruments::{InstrumentDetail, InstrumentRecord};
use crate::lifecycle::LifecycleState;
use crate::settings::SettingsServiceTrait;
use crate::utils::valuation_date_today;
use crate::valuation::ValuationEngine;

pub struct FixedDepositService {
    repository: Arc<dyn FixedDepositRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl FixedDepositService {
    pub fn new(
        repository: Arc<dyn FixedDepositRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            repository,
            settings_service,
        }
    }

    fn to_detail(&self, deposit: FixedDeposit) -> Result<InstrumentDetail> {
        let engine = ValuationEngine::new(&self.settings_service.get_engine_settings()?);
        Ok(engine.detail(
            InstrumentRecord::FixedDeposit(deposit),
            valuation_date_today(),
        ))
    }
}

#[async_trait]
impl FixedDepositServiceTrait for FixedDepositService {
    fn get_fixed_deposit(&self, deposit_id: i64) -> Result<InstrumentDetail> {
        let deposit = self.repository.get_by_id(deposit_id)?;
        self.to_detail(deposit)
    }

    fn list_fixed_deposits(&self) -> Result<Vec<InstrumentDetail>> {
        self.repository
            .list()?
            .into_iter()
            .map(|deposit| self.to_detail(deposit))
            .collect()
    }

    async fn create_fixed_deposit(&self, new_deposit: NewFixedDeposit) -> Result<InstrumentDetail> {
        new_deposit.validate()?;
        let created = self.repository.create(new_deposit).await?;
        debug!("Created fixed deposit {} ({})", created.id, created.name);
        self.to_detail(created)
    }

    async fn update_fixed_deposit(&self, update: FixedDepositUpdate) -> Result<InstrumentDetail> {
        update.validate()?;
        let mut deposit = self.repository.get_by_id(update.id)?;
        deposit.status.ensure_editable()?;
        update.apply_to(&mut deposit);
        let saved = self.repository.update(deposit).await?;
        self.to_detail(saved)
    }

    async fn delete_fixed_deposit(&self, deposit_id: i64) -> Result<usize> {
        self.repository.delete(deposit_id).await
    }

    async fn close_fixed_deposit(
        &self,
        deposit_id: i64,
        actual_withdrawal: Decimal,
        closed_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        ensure_positive("actualWithdrawal", actual_withdrawal)?;
        let mut deposit = self.repository.get_by_id(deposit_id)?;
        deposit.status = deposit.status.close(actual_withdrawal, closed_date)?;
        debug!(
            "Closing fixed deposit {} on {} with withdrawal {}",
            deposit_id, closed_date, actual_withdrawal
        );
        let saved = self.repository.update(deposit).await?;
        self.to_detail(saved)
    }

    async fn amend_closed_fixed_deposit(
        &self,
        deposit_id: i64,
        amendment: ClosureAmendment,
    ) -> Result<InstrumentDetail> {
        amendment.validate()?;
        let mut deposit = self.repository.get_by_id(deposit_id)?;
        let amended = deposit
            .status
            .amend_closure(amendment.actual_withdrawal, amendment.closed_date)?;

        // No history of the original closure is kept anywhere else.
        warn!(
            "Amending closed fixed deposit {}: withdrawal {:?} -> {}, closed {:?} -> {}",
            deposit_id,
            deposit.status.actual_withdrawal(),
            amendment.actual_withdrawal,
            deposit.status.closed_date(),
            amendment.closed_date
        );
        deposit.status = amended;
        deposit.notes = amendment.notes;
        let saved = self.repository.update(deposit).await?;
        self.to_detail(saved)
    }
}
