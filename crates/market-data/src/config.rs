//! Resolver configuration.

use std::env;
use std::time::Duration;

use log::warn;

pub const DEFAULT_MFAPI_URL: &str = "https://api.mfapi.in";
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;

pub const MFAPI_URL_ENV: &str = "WEALTHLEDGER_MFAPI_URL";
pub const COINGECKO_URL_ENV: &str = "WEALTHLEDGER_COINGECKO_URL";
pub const TIMEOUT_SECS_ENV: &str = "WEALTHLEDGER_RESOLVER_TIMEOUT_SECS";

/// Endpoints and timeouts shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub mfapi_base_url: String,
    pub coingecko_base_url: String,
    /// Applied to every request, including Yahoo lookups.
    pub timeout: Duration,
    /// Wait before the single retry of a rate-limited or timed-out lookup.
    pub retry_backoff: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mfapi_base_url: DEFAULT_MFAPI_URL.to_string(),
            coingecko_base_url: DEFAULT_COINGECKO_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by environment variables. Invalid values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(MFAPI_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.mfapi_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup(COINGECKO_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.coingecko_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_SECS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid {}='{}'", TIMEOUT_SECS_ENV, raw),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_overrides() {
        let config = ResolverConfig::from_lookup(|_| None);
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_overrides_and_invalid_timeout() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (MFAPI_URL_ENV, "http://localhost:8080/"),
            (TIMEOUT_SECS_ENV, "zero"),
        ]);
        let config = ResolverConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.mfapi_base_url, "http://localhost:8080");
        assert_eq!(config.coingecko_base_url, DEFAULT_COINGECKO_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let vars: HashMap<&str, &str> = HashMap::from([(TIMEOUT_SECS_ENV, "5")]);
        let config = ResolverConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
