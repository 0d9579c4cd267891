//! Routes a [`PriceSource`] to the provider that serves it.
//!
//! Mutual fund NAVs come from MFAPI, listed equities from Yahoo Finance and
//! crypto prices from CoinGecko.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use wealthledger_core::errors::Result as CoreResult;
use wealthledger_core::market_data::{PriceResolverTrait, PriceSource};

use crate::config::ResolverConfig;
use crate::errors::{MarketDataError, RetryClass};
use crate::provider::yahoo::nse_symbol;
use crate::provider::{CoinGeckoProvider, MfApiProvider, PriceProvider, YahooProvider};

pub struct PriceResolver {
    mutual_funds: Arc<dyn PriceProvider>,
    equities: Arc<dyn PriceProvider>,
    crypto: Arc<dyn PriceProvider>,
    retry_backoff: Duration,
}

impl PriceResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, MarketDataError> {
        Ok(Self::with_providers(
            Arc::new(MfApiProvider::new(config)),
            Arc::new(YahooProvider::new(config)?),
            Arc::new(CoinGeckoProvider::new(config)),
            config.retry_backoff,
        ))
    }

    pub fn with_providers(
        mutual_funds: Arc<dyn PriceProvider>,
        equities: Arc<dyn PriceProvider>,
        crypto: Arc<dyn PriceProvider>,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            mutual_funds,
            equities,
            crypto,
            retry_backoff,
        }
    }

    fn route(&self, source: &PriceSource) -> (&Arc<dyn PriceProvider>, String) {
        match source {
            PriceSource::MutualFundNav(code) => (&self.mutual_funds, code.trim().to_string()),
            PriceSource::IndianEquity(symbol) => (&self.equities, nse_symbol(symbol)),
            PriceSource::UsEquity(symbol) => {
                (&self.equities, symbol.trim().to_ascii_uppercase())
            }
            PriceSource::Crypto(coin) => (&self.crypto, coin.trim().to_ascii_lowercase()),
        }
    }

    /// One attempt plus a single retry for rate limits and timeouts.
    async fn fetch(
        &self,
        provider: &Arc<dyn PriceProvider>,
        symbol: &str,
    ) -> Result<Decimal, MarketDataError> {
        match provider.latest_price(symbol).await {
            Err(err) if err.retry_class() == RetryClass::WithBackoff => {
                debug!(
                    "{} lookup for {} failed ({}), retrying in {:?}",
                    provider.id(),
                    symbol,
                    err,
                    self.retry_backoff
                );
                tokio::time::sleep(self.retry_backoff).await;
                provider.latest_price(symbol).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl PriceResolverTrait for PriceResolver {
    async fn lookup(&self, source: &PriceSource) -> CoreResult<Option<Decimal>> {
        let (provider, symbol) = self.route(source);
        if symbol.is_empty() {
            return Ok(None);
        }

        match self.fetch(provider, &symbol).await {
            Ok(price) => {
                debug!("{} price for {}: {}", provider.id(), source, price);
                Ok(Some(price))
            }
            Err(err) if err.is_not_found() => {
                debug!("{} has no price for {}", provider.id(), source);
                Ok(None)
            }
            Err(err) => {
                warn!("{} lookup failed for {}: {}", provider.id(), source, err);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use wealthledger_core::errors::Error as CoreError;

    /// Replays scripted outcomes and records every symbol it was asked for.
    struct ScriptedProvider {
        outcomes: Mutex<VecDeque<Result<Decimal, MarketDataError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<Result<Decimal, MarketDataError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        async fn latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
            self.calls.lock().unwrap().push(symbol.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(MarketDataError::SymbolNotFound(symbol.to_string())))
        }
    }

    fn resolver(
        funds: Arc<ScriptedProvider>,
        equities: Arc<ScriptedProvider>,
        crypto: Arc<ScriptedProvider>,
    ) -> PriceResolver {
        PriceResolver::with_providers(funds, equities, crypto, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_routes_each_source_to_its_provider() {
        let funds = ScriptedProvider::new(vec![Ok(dec!(45.1234))]);
        let equities = ScriptedProvider::new(vec![Ok(dec!(3500)), Ok(dec!(189.5))]);
        let crypto = ScriptedProvider::new(vec![Ok(dec!(67000))]);
        let resolver = resolver(funds.clone(), equities.clone(), crypto.clone());

        let nav = resolver
            .lookup(&PriceSource::MutualFundNav("120503".to_string()))
            .await
            .unwrap();
        let tcs = resolver
            .lookup(&PriceSource::IndianEquity("tcs".to_string()))
            .await
            .unwrap();
        let aapl = resolver
            .lookup(&PriceSource::UsEquity("aapl".to_string()))
            .await
            .unwrap();
        let btc = resolver
            .lookup(&PriceSource::Crypto("Bitcoin".to_string()))
            .await
            .unwrap();

        assert_eq!(nav, Some(dec!(45.1234)));
        assert_eq!(tcs, Some(dec!(3500)));
        assert_eq!(aapl, Some(dec!(189.5)));
        assert_eq!(btc, Some(dec!(67000)));
        assert_eq!(funds.calls(), vec!["120503"]);
        assert_eq!(equities.calls(), vec!["TCS.NS", "AAPL"]);
        assert_eq!(crypto.calls(), vec!["bitcoin"]);
    }

    #[tokio::test]
    async fn test_not_found_is_none() {
        let funds = ScriptedProvider::new(vec![Err(MarketDataError::SymbolNotFound(
            "999999".to_string(),
        ))]);
        let resolver = resolver(
            funds,
            ScriptedProvider::new(vec![]),
            ScriptedProvider::new(vec![]),
        );

        let nav = resolver
            .lookup(&PriceSource::MutualFundNav("999999".to_string()))
            .await
            .unwrap();
        assert_eq!(nav, None);
    }

    #[tokio::test]
    async fn test_blank_identifier_skips_provider() {
        let equities = ScriptedProvider::new(vec![]);
        let resolver = resolver(
            ScriptedProvider::new(vec![]),
            equities.clone(),
            ScriptedProvider::new(vec![]),
        );

        let price = resolver
            .lookup(&PriceSource::UsEquity("  ".to_string()))
            .await
            .unwrap();
        assert_eq!(price, None);
        assert!(equities.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_retried_once() {
        let crypto = ScriptedProvider::new(vec![
            Err(MarketDataError::RateLimited {
                provider: "COINGECKO".to_string(),
            }),
            Ok(dec!(3100.25)),
        ]);
        let resolver = resolver(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::new(vec![]),
            crypto.clone(),
        );

        let price = resolver
            .lookup(&PriceSource::Crypto("ethereum".to_string()))
            .await
            .unwrap();
        assert_eq!(price, Some(dec!(3100.25)));
        assert_eq!(crypto.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_persistent_timeout_is_external_lookup_error() {
        let timeout = || {
            Err(MarketDataError::Timeout {
                provider: "YAHOO".to_string(),
            })
        };
        let equities = ScriptedProvider::new(vec![timeout(), timeout(), Ok(dec!(1))]);
        let resolver = resolver(
            ScriptedProvider::new(vec![]),
            equities.clone(),
            ScriptedProvider::new(vec![]),
        );

        let err = resolver
            .lookup(&PriceSource::UsEquity("MSFT".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ExternalLookup(_)));
        assert_eq!(equities.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_not_retried() {
        let funds = ScriptedProvider::new(vec![Err(MarketDataError::ProviderError {
            provider: "MFAPI".to_string(),
            message: "HTTP 500".to_string(),
        })]);
        let resolver = resolver(
            funds.clone(),
            ScriptedProvider::new(vec![]),
            ScriptedProvider::new(vec![]),
        );

        assert!(resolver
            .lookup(&PriceSource::MutualFundNav("100".to_string()))
            .await
            .is_err());
        assert_eq!(funds.calls().len(), 1);
    }
}
