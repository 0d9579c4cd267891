//! Tradable position (stock / crypto / custom tile) domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{ensure_not_blank, ensure_positive, Error, Result, ValidationError};
use crate::instruments::Currency;
use crate::lifecycle::{LifecycleState, TradableStatus};
use crate::valuation::returns_percent;

/// Where a tradable position is listed. Decides its currency and price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    IndianEquity,
    UsEquity,
    Crypto,
    /// User-maintained tile with a manually entered price.
    Custom,
}

impl Market {
    pub fn currency(&self) -> Currency {
        match self {
            Market::IndianEquity | Market::Custom => Currency::Inr,
            Market::UsEquity | Market::Crypto => Currency::Usd,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::IndianEquity => "INDIAN_EQUITY",
            Market::UsEquity => "US_EQUITY",
            Market::Crypto => "CRYPTO",
            Market::Custom => "CUSTOM",
        }
    }
}

impl FromStr for Market {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INDIAN_EQUITY" => Ok(Market::IndianEquity),
            "US_EQUITY" => Ok(Market::UsEquity),
            "CRYPTO" => Ok(Market::Crypto),
            "CUSTOM" => Ok(Market::Custom),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown market '{}'",
                other
            )))),
        }
    }
}

/// Domain model representing a tradable position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradablePosition {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    /// Resolver identifier when it differs from the symbol (e.g. a CoinGecko coin id).
    pub lookup_id: Option<String>,
    pub market: Market,
    pub quantity: Decimal,
    pub buy_price: Decimal,
    pub buy_date: NaiveDate,
    pub current_price: Decimal,
    pub status: TradableStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TradablePosition {
    pub fn invested_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.buy_price)
    }

    pub fn current_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.current_price)
    }

    pub fn profit_loss(&self) -> Decimal {
        self.current_value().saturating_sub(self.invested_value())
    }

    pub fn profit_loss_percent(&self) -> Decimal {
        returns_percent(self.current_value(), self.invested_value())
    }

    /// Identifier handed to the price resolver.
    pub fn lookup_identifier(&self) -> &str {
        self.lookup_id.as_deref().unwrap_or(&self.symbol)
    }

    /// Sells the whole position. Quantity is kept and the price is frozen at the sale price.
    pub fn sell(&mut self, sell_price: Decimal, sell_date: NaiveDate) -> Result<()> {
        ensure_positive("sellPrice", sell_price)?;
        self.status = self.status.sell(sell_price, sell_date)?;
        self.current_price = sell_price;
        Ok(())
    }

    /// Applies a refreshed price. Sold positions ignore refreshes; returns whether the price changed.
    pub fn update_price(&mut self, price: Decimal) -> Result<bool> {
        ensure_positive("price", price)?;
        if self.status.is_terminal() {
            log::debug!(
                "Ignoring price refresh for sold position {} ({})",
                self.id,
                self.symbol
            );
            return Ok(false);
        }
        let changed = self.current_price != price;
        self.current_price = price;
        Ok(changed)
    }
}

/// Input model for creating a new tradable position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTradablePosition {
    pub name: String,
    pub symbol: String,
    pub lookup_id: Option<String>,
    pub market: Market,
    pub quantity: Decimal,
    pub buy_price: Decimal,
    pub buy_date: NaiveDate,
    /// Defaults to the buy price.
    pub current_price: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewTradablePosition {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_not_blank("symbol", &self.symbol)?;
        ensure_positive("quantity", self.quantity)?;
        ensure_positive("buyPrice", self.buy_price)?;
        if let Some(price) = self.current_price {
            ensure_positive("currentPrice", price)?;
        }
        Ok(())
    }
}

/// Descriptive edit of a held position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradablePositionUpdate {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub lookup_id: Option<String>,
    pub notes: Option<String>,
}

impl TradablePositionUpdate {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_not_blank("symbol", &self.symbol)
    }

    pub fn apply_to(self, position: &mut TradablePosition) {
        position.name = self.name;
        position.symbol = self.symbol;
        position.lookup_id = self.lookup_id;
        position.notes = self.notes;
    }
}
