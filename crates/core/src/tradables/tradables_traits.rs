//! Repository and service traits for tradable positions.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::tradables_model::{NewTradablePosition, TradablePosition, TradablePositionUpdate};
use crate::errors::Result;
use crate::instruments::InstrumentDetail;

#[async_trait]
pub trait TradableRepositoryTrait: Send + Sync {
    fn get_by_id(&self, position_id: i64) -> Result<TradablePosition>;
    fn list(&self) -> Result<Vec<TradablePosition>>;
    async fn create(&self, new_position: NewTradablePosition) -> Result<TradablePosition>;
    async fn update(&self, position: TradablePosition) -> Result<TradablePosition>;
    async fn delete(&self, position_id: i64) -> Result<usize>;
}

#[async_trait]
pub trait TradableServiceTrait: Send + Sync {
    fn get_position(&self, position_id: i64) -> Result<InstrumentDetail>;
    fn list_positions(&self) -> Result<Vec<InstrumentDetail>>;
    async fn create_position(&self, new_position: NewTradablePosition) -> Result<InstrumentDetail>;
    async fn update_position(&self, update: TradablePositionUpdate) -> Result<InstrumentDetail>;
    async fn delete_position(&self, position_id: i64) -> Result<usize>;
    async fn sell(
        &self,
        position_id: i64,
        sell_price: Decimal,
        sell_date: NaiveDate,
    ) -> Result<InstrumentDetail>;
    /// Records a refreshed price. Sold positions are returned unchanged.
    async fn update_price(&self, position_id: i64, price: Decimal) -> Result<InstrumentDetail>;
}
