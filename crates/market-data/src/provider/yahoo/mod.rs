//! Equity price provider backed by Yahoo Finance.
//!
//! Indian listings are looked up on NSE through the `.NS` suffix.

use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;

use super::PriceProvider;
use crate::config::ResolverConfig;
use crate::errors::MarketDataError;

const PROVIDER_ID: &str = "YAHOO";
const NSE_SUFFIX: &str = ".NS";

/// Yahoo symbol for an NSE listing. Symbols that already carry an exchange suffix are kept.
pub fn nse_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_ascii_uppercase();
    if symbol.contains('.') {
        symbol
    } else {
        format!("{}{}", symbol, NSE_SUFFIX)
    }
}

pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    timeout: Duration,
}

impl YahooProvider {
    pub fn new(config: &ResolverConfig) -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self {
            connector,
            timeout: config.timeout,
        })
    }

    fn close_price(symbol: &str, close: f64) -> Result<Decimal, MarketDataError> {
        let price = Decimal::from_f64_retain(close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!("Invalid close price {} for {}", close, symbol),
            }
        })?;
        if price <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Non-positive close price {} for {}", price, symbol),
            });
        }
        Ok(price.round_dp(6))
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        let request = self.connector.get_latest_quotes(symbol, "1d");
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            })?
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;
        Self::close_price(symbol, quote.close)
    }
}
