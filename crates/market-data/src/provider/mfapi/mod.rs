//! Mutual-fund NAV provider backed by mfapi.in.
//!
//! `GET {base}/mf/{scheme_code}/latest` returns the latest NAV as a string.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use urlencoding::encode;

use super::{fetch_text, http_client, PriceProvider};
use crate::config::ResolverConfig;
use crate::errors::MarketDataError;

const PROVIDER_ID: &str = "MFAPI";

#[derive(Debug, Deserialize)]
pub(crate) struct NavResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<NavPoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NavPoint {
    pub date: String,
    pub nav: String,
}

pub struct MfApiProvider {
    client: Client,
    base_url: String,
}

impl MfApiProvider {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            client: http_client(config.timeout),
            base_url: config.mfapi_base_url.clone(),
        }
    }

    pub(crate) fn parse_nav(scheme_code: &str, body: &str) -> Result<Decimal, MarketDataError> {
        let response: NavResponse =
            serde_json::from_str(body).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse NAV response: {}", e),
            })?;

        if response
            .status
            .as_deref()
            .is_some_and(|s| !s.eq_ignore_ascii_case("SUCCESS"))
        {
            return Err(MarketDataError::SymbolNotFound(scheme_code.to_string()));
        }

        let latest = response
            .data
            .first()
            .ok_or_else(|| MarketDataError::SymbolNotFound(scheme_code.to_string()))?;
        let nav = Decimal::from_str(latest.nav.trim()).map_err(|_| {
            MarketDataError::ValidationFailed {
                message: format!("Invalid NAV '{}' for scheme {}", latest.nav, scheme_code),
            }
        })?;
        if nav <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Non-positive NAV {} for scheme {}", nav, scheme_code),
            });
        }
        debug!("NAV for scheme {} on {}: {}", scheme_code, latest.date, nav);
        Ok(nav)
    }
}

#[async_trait]
impl PriceProvider for MfApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_price(&self, scheme_code: &str) -> Result<Decimal, MarketDataError> {
        let url = format!("{}/mf/{}/latest", self.base_url, encode(scheme_code.trim()));
        let body = fetch_text(&self.client, PROVIDER_ID, &url).await?;
        Self::parse_nav(scheme_code, &body)
    }
}
