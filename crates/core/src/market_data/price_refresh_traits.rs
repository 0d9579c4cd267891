use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::price_source_model::{PriceSource, RefreshSummary};
use crate::errors::Result;

/// External price/NAV lookup.
///
/// `Ok(None)` means the source has no such identifier. Transport and provider failures are
/// `Err(Error::ExternalLookup)`.
#[async_trait]
pub trait PriceResolverTrait: Send + Sync {
    async fn lookup(&self, source: &PriceSource) -> Result<Option<Decimal>>;
}

#[async_trait]
pub trait PriceRefreshServiceTrait: Send + Sync {
    /// Refreshes the NAV of every open fund that has a scheme code.
    async fn refresh_mutual_fund_navs(&self, as_of: NaiveDate) -> Result<RefreshSummary>;
    /// Refreshes the price of every held position outside the custom market.
    async fn refresh_tradable_prices(&self) -> Result<RefreshSummary>;
    async fn refresh_all(&self, as_of: NaiveDate) -> Result<RefreshSummary>;
    /// Stops a running refresh before its next instrument.
    fn cancel(&self);
}
