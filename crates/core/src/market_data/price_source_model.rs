//! Price lookup requests and bulk refresh results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::instruments::InstrumentClass;
use crate::tradables::{Market, TradablePosition};

/// Where the latest price of an instrument comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    /// Mutual-fund scheme code.
    MutualFundNav(String),
    /// NSE symbol without exchange suffix.
    IndianEquity(String),
    UsEquity(String),
    /// Coin identifier (e.g. "bitcoin").
    Crypto(String),
}

impl PriceSource {
    /// `None` for custom tiles, which are priced by hand.
    pub fn for_position(position: &TradablePosition) -> Option<Self> {
        let id = position.lookup_identifier().trim();
        if id.is_empty() {
            return None;
        }
        match position.market {
            Market::IndianEquity => Some(PriceSource::IndianEquity(id.to_string())),
            Market::UsEquity => Some(PriceSource::UsEquity(id.to_string())),
            Market::Crypto => Some(PriceSource::Crypto(id.to_ascii_lowercase())),
            Market::Custom => None,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            PriceSource::MutualFundNav(id)
            | PriceSource::IndianEquity(id)
            | PriceSource::UsEquity(id)
            | PriceSource::Crypto(id) => id,
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::MutualFundNav(code) => write!(f, "NAV:{}", code),
            PriceSource::IndianEquity(symbol) => write!(f, "NSE:{}", symbol),
            PriceSource::UsEquity(symbol) => write!(f, "US:{}", symbol),
            PriceSource::Crypto(id) => write!(f, "CRYPTO:{}", id),
        }
    }
}

/// One instrument whose price could not be refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    pub class: InstrumentClass,
    pub instrument_id: i64,
    pub name: String,
    pub reason: String,
}

/// Tally of a bulk refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    /// Instruments a lookup was issued for.
    pub attempted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// No lookup source, or not reached before cancellation.
    pub skipped: usize,
    pub cancelled: bool,
    pub failures: Vec<RefreshFailure>,
}

impl RefreshSummary {
    pub fn summary(&self) -> String {
        format!("updated {} of {}", self.updated, self.attempted)
    }

    pub fn merge(&mut self, other: RefreshSummary) {
        self.attempted += other.attempted;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.cancelled |= other.cancelled;
        self.failures.extend(other.failures);
    }

    pub(crate) fn record_failure(
        &mut self,
        class: InstrumentClass,
        instrument_id: i64,
        name: &str,
        reason: String,
    ) {
        self.failed += 1;
        self.failures.push(RefreshFailure {
            class,
            instrument_id,
            name: name.to_string(),
            reason,
        });
    }
}
