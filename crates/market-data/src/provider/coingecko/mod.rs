//! Crypto price provider backed by the CoinGecko simple price API.
//!
//! `GET {base}/api/v3/simple/price?ids={coin}&vs_currencies=usd`

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use urlencoding::encode;

use super::{fetch_text, http_client, PriceProvider};
use crate::config::ResolverConfig;
use crate::errors::MarketDataError;

const PROVIDER_ID: &str = "COINGECKO";
const QUOTE_CURRENCY: &str = "usd";

pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            client: http_client(config.timeout),
            base_url: config.coingecko_base_url.clone(),
        }
    }

    /// Reads `{coin: {usd: price}}`. A missing coin key means the id is unknown.
    pub(crate) fn parse_price(coin_id: &str, body: &str) -> Result<Decimal, MarketDataError> {
        let value: Value = serde_json::from_str(body).map_err(|e| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse price response: {}", e),
        })?;

        let price = value
            .get(coin_id)
            .and_then(|coin| coin.get(QUOTE_CURRENCY))
            .ok_or_else(|| MarketDataError::SymbolNotFound(coin_id.to_string()))?;

        let price = price
            .as_f64()
            .and_then(Decimal::from_f64_retain)
            .map(|p| p.normalize())
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid price {} for {}", price, coin_id),
            })?;
        if price <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Non-positive price {} for {}", price, coin_id),
            });
        }
        Ok(price)
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_price(&self, coin_id: &str) -> Result<Decimal, MarketDataError> {
        let coin_id = coin_id.trim().to_ascii_lowercase();
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies={}",
            self.base_url,
            encode(&coin_id),
            QUOTE_CURRENCY
        );
        let body = fetch_text(&self.client, PROVIDER_ID, &url).await?;
        Self::parse_price(&coin_id, &body)
    }
}
