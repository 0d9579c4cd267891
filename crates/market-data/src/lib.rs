//! Wealthledger Market Data Crate
//!
//! Latest-price lookups for the portfolio engine. The crate implements
//! [`wealthledger_core::market_data::PriceResolverTrait`] on top of three
//! public sources:
//!
//! - MFAPI for Indian mutual fund NAVs, keyed by scheme code
//! - Yahoo Finance for NSE and US equities
//! - CoinGecko for crypto prices in USD
//!
//! ```text
//! PriceSource --> PriceResolver --> PriceProvider --> Decimal
//! ```
//!
//! An unknown identifier resolves to `Ok(None)`. Rate limits and timeouts are
//! retried once; every other failure surfaces as an external lookup error.

pub mod config;
pub mod errors;
pub mod provider;
pub mod resolver;

pub use config::ResolverConfig;
pub use errors::{MarketDataError, RetryClass};
pub use provider::PriceProvider;
pub use resolver::PriceResolver;
