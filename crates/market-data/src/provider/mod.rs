//! Price providers.

pub mod coingecko;
pub mod mfapi;
mod traits;
pub mod yahoo;

pub use coingecko::CoinGeckoProvider;
pub use mfapi::MfApiProvider;
pub use traits::PriceProvider;
pub use yahoo::YahooProvider;

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::errors::MarketDataError;

pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GETs `url` and returns the body, mapping transport and status failures.
pub(crate) async fn fetch_text(
    client: &Client,
    provider: &str,
    url: &str,
) -> Result<String, MarketDataError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            MarketDataError::ProviderError {
                provider: provider.to_string(),
                message: format!("Request failed: {}", e),
            }
        }
    })?;
    check_status(provider, response).await
}

async fn check_status(provider: &str, response: Response) -> Result<String, MarketDataError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if status == StatusCode::NOT_FOUND {
        return Err(MarketDataError::SymbolNotFound(response.url().path().to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {} - {}", status, body),
        });
    }
    response
        .text()
        .await
        .map_err(|e| MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("Failed to read response: {}", e),
        })
}
