use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use super::rollup_calculator::{rollup, summarize_class};
use super::rollup_model::PortfolioRollup;
use crate::errors::{Error, Result, ValidationError};
use crate::fixed_deposits::FixedDepositServiceTrait;
use crate::instruments::{InstrumentClass, InstrumentDetail, InstrumentSummary};
use crate::mutual_funds::MutualFundServiceTrait;
use crate::recurring_deposits::RecurringDepositServiceTrait;
use crate::settings::SettingsServiceTrait;
use crate::valuation::ValuationEngine;

/// Cross-class reads and the redeem/close dispatch.
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    fixed_deposit_service: Arc<dyn FixedDepositServiceTrait>,
    mutual_fund_service: Arc<dyn MutualFundServiceTrait>,
    recurring_deposit_service: Arc<dyn RecurringDepositServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
        fixed_deposit_service: Arc<dyn FixedDepositServiceTrait>,
        mutual_fund_service: Arc<dyn MutualFundServiceTrait>,
        recurring_deposit_service: Arc<dyn RecurringDepositServiceTrait>,
    ) -> Self {
        Self {
            repository,
            settings_service,
            fixed_deposit_service,
            mutual_fund_service,
            recurring_deposit_service,
        }
    }

    fn engine(&self) -> Result<ValuationEngine> {
        Ok(ValuationEngine::new(
            &self.settings_service.get_engine_settings()?,
        ))
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_instrument_summary(
        &self,
        class: InstrumentClass,
        as_of: NaiveDate,
    ) -> Result<InstrumentSummary> {
        let engine = self.engine()?;
        let snapshot = self.repository.load_snapshot()?;
        Ok(summarize_class(class, &snapshot.instruments, &engine, as_of))
    }

    fn get_instrument_summaries(&self, as_of: NaiveDate) -> Result<Vec<InstrumentSummary>> {
        let engine = self.engine()?;
        let snapshot = self.repository.load_snapshot()?;
        Ok(InstrumentClass::ALL
            .iter()
            .map(|class| summarize_class(*class, &snapshot.instruments, &engine, as_of))
            .collect())
    }

    fn get_instrument_detail(
        &self,
        class: InstrumentClass,
        instrument_id: i64,
        as_of: NaiveDate,
    ) -> Result<InstrumentDetail> {
        let engine = self.engine()?;
        let record = self.repository.get_instrument(class, instrument_id)?;
        Ok(engine.detail(record, as_of))
    }

    async fn redeem_or_close(
        &self,
        class: InstrumentClass,
        instrument_id: i64,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        debug!("redeem_or_close {} {} for {} on {}", class, instrument_id, amount, date);
        match class {
            InstrumentClass::FixedDeposit => {
                self.fixed_deposit_service
                    .close_fixed_deposit(instrument_id, amount, date)
                    .await
            }
            InstrumentClass::MutualFund => {
                self.mutual_fund_service
                    .redeem(instrument_id, amount, date)
                    .await
            }
            InstrumentClass::RecurringDeposit => {
                self.recurring_deposit_service
                    .close_recurring_deposit(instrument_id, amount, date)
                    .await
            }
            InstrumentClass::Tradable => Err(Error::Validation(ValidationError::InvalidInput(
                "Tradable positions are closed by selling them".to_string(),
            ))),
        }
    }

    fn rollup_portfolio(&self, as_of: NaiveDate) -> Result<PortfolioRollup> {
        let engine = self.engine()?;
        let snapshot = self.repository.load_snapshot()?;
        let result = rollup(&snapshot, &engine, as_of);
        info!(
            "Portfolio rollup as of {}: net worth {} INR, {} USD across {} instruments",
            as_of,
            result.net_worth,
            result.usd_net_worth,
            snapshot.instruments.len()
        );
        Ok(result)
    }
}
