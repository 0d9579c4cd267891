use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::tradables_model::{NewTradablePosition, TradablePosition, TradablePositionUpdate};
use super::tradables_traits::{TradableRepositoryTrait, TradableServiceTrait};
use crate::errors::Result;
use crate::instruments::{InstrumentDetail, InstrumentRecord};
use crate::lifecycle::LifecycleState;
use crate::utils::valuation_date_today;
use crate::valuation::{MarkToMarketCalculator, ValuationCalculator};

pub struct TradableService {
    repository: Arc<dyn TradableRepositoryTrait>,
}

impl TradableService {
    pub fn new(repository: Arc<dyn TradableRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn to_detail(&self, position: TradablePosition) -> InstrumentDetail {
        let valuation = MarkToMarketCalculator.value(&position, valuation_date_today());
        InstrumentDetail::new(InstrumentRecord::Tradable(position), valuation)
    }
}

#[async_trait]
impl TradableServiceTrait for TradableService {
    fn get_position(&self, position_id: i64) -> Result<InstrumentDetail> {
        Ok(self.to_detail(self.repository.get_by_id(position_id)?))
    }

    fn list_positions(&self) -> Result<Vec<InstrumentDetail>> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .map(|position| self.to_detail(position))
            .collect())
    }

    async fn create_position(&self, new_position: NewTradablePosition) -> Result<InstrumentDetail> {
        new_position.validate()?;
        let created = self.repository.create(new_position).await?;
        debug!(
            "Created {} position {} ({})",
            created.market.as_str(),
            created.id,
            created.symbol
        );
        Ok(self.to_detail(created))
    }

    async fn update_position(&self, update: TradablePositionUpdate) -> Result<InstrumentDetail> {
        update.validate()?;
        let mut position = self.repository.get_by_id(update.id)?;
        position.status.ensure_editable()?;
        update.apply_to(&mut position);
        let saved = self.repository.update(position).await?;
        Ok(self.to_detail(saved))
    }

    async fn delete_position(&self, position_id: i64) -> Result<usize> {
        self.repository.delete(position_id).await
    }

    async fn sell(
        &self,
        position_id: i64,
        sell_price: Decimal,
        sell_date: NaiveDate,
    ) -> Result<InstrumentDetail> {
        let mut position = self.repository.get_by_id(position_id)?;
        position.sell(sell_price, sell_date)?;
        debug!(
            "Sold position {} ({}) at {} on {}",
            position_id, position.symbol, sell_price, sell_date
        );
        let saved = self.repository.update(position).await?;
        Ok(self.to_detail(saved))
    }

    async fn update_price(&self, position_id: i64, price: Decimal) -> Result<InstrumentDetail> {
        let mut position = self.repository.get_by_id(position_id)?;
        if !position.update_price(price)? {
            return Ok(self.to_detail(position));
        }
        let saved = self.repository.update(position).await?;
        Ok(self.to_detail(saved))
    }
}
