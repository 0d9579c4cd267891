//! Price provider trait.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;

/// One upstream source of latest prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Constant identifier such as "MFAPI" or "YAHOO", used in logs and errors.
    fn id(&self) -> &'static str;

    /// Latest price for a provider-specific identifier.
    ///
    /// Unknown identifiers are [`MarketDataError::SymbolNotFound`].
    async fn latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError>;
}
