use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::mutual_funds_model::{MutualFund, MutualFundUpdate, NewInstallment, NewMutualFund};
use super::mutual_funds_traits::{MutualFundRepositoryTrait, MutualFundServiceTrait};
use crate::errors::{ensure_positive, Result};
use crate::instruments::{InstrumentDetail, InstrumentRecord};
use crate::lifecycle::LifecycleState;
use crate::settings::SettingsServiceTrait;
use crate::utils::valuation_date_today;
use crate::valuation::ValuationEngine;

pub struct MutualFundService {
    repository: Arc<dyn MutualFundRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl MutualFundService {
    pub fn new(
        repository: Arc<dyn MutualFundRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            repository,
            settings_service,
        }
    }

    fn to_detail(&self, fund: MutualFund) -> Result<InstrumentDetail> {
        let engine = ValuationEngine::new(&self.settings_service.get_engine_settings()?);
        Ok(engine.detail(InstrumentRecord::MutualFund(fund), valuation_date_today()))
    }
}

#[async_trait]
impl MutualFundServiceTrait for MutualFundService {
    fn get_mutual_fund(&self, fund_id: i64) -> Result<InstrumentDetail> {
        self.to_detail(self.repository.get_by_id(fund_id)?)
    }

    fn list_mutual_funds(&self) -> Result<Vec<InstrumentDetail>> {
        self.repository
            .list()?
            .into_iter()
            .map(|fund| self.to_detail(fund))
            .collect()
    }

    async fn create_mutual_fund(&self, new_fund: NewMutualFund) -> Result<InstrumentDetail> {
        new_fund.validate()?;
        let created = self.repository.create(new_fund).await?;
        debug!("Created mutual fund {} ({})", created.id, created.name);
        self.to_detail(created)
    }

    async fn update_mutual_fund(&self, update: MutualFundUpdate) -> Result<InstrumentDetail> {
        update.validate()?;
        let mut fund = self.repository.get_by_id(update.id)?;
        fund.status.ensure_editable()?;
        update.apply_to(&mut fund);
        let saved = self.repository.update(fund).await?;
        self.to_detail(saved)
    }

    async fn delete_mutual_fund(&self, fund_id: i64) -> Result<usize> {
        self.repository.delete(fund_id).await
    }

    async fn apply_installment(
        &self,
        fund_id: i64,
        installment: NewInstallment,
    ) -> Result<InstrumentDetail> {
        let mut fund = self.repository.get_by_id(fund_id)?;
        let entry = fund.apply_installment(installment)?;
        debug!(
            "Applying {} installment of {} at NAV {} to fund {} ({} units)",
            entry.kind.as_str(),
            entry.amount,
            entry.nav_at_purchase,
            fund_id,
            entry.units
        );
        let saved = self.repository.append_installment(fund, entry).await?;
        self.to_detail(saved)
    }

    async fn pause_resume(&self, fund_id: i64) -> Result<InstrumentDetail> {
        let mut fund = self.repository.get_by_id(fund_id)?;
        fund.status = fund.status.toggle_pause()?;
        debug!("Fund {} is now {}", fund_id, fund.status.label());
        let saved = self.repository.update(fund).await?;
        self.to_detail(saved)
    }

    async fn redeem(
        &self,
        fund_id: i64,
        redeemed_amount: Decimal,
        redeemed_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        ensure_positive("redeemedAmount", redeemed_amount)?;
        let mut fund = self.repository.get_by_id(fund_id)?;
        fund.status = fund.status.redeem(redeemed_amount, redeemed_date)?;
        debug!(
            "Redeemed fund {} for {} on {}",
            fund_id, redeemed_amount, redeemed_date
        );
        let saved = self.repository.update(fund).await?;
        self.to_detail(saved)
    }

    async fn update_nav(
        &self,
        fund_id: i64,
        nav: Decimal,
        nav_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        let mut fund = self.repository.get_by_id(fund_id)?;
        fund.update_nav(nav, nav_date)?;
        let saved = self.repository.update(fund).await?;
        self.to_detail(saved)
    }
}
