//! Database models for tradable positions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wealthledger_core::lifecycle::{LifecycleState, TradableStatus};
use wealthledger_core::tradables::{Market, NewTradablePosition, TradablePosition};

use crate::errors::StorageError;
use crate::utils::{
    date_to_text, datetime_to_text, decimal_to_text, mismatched_status, parse_date,
    parse_datetime, parse_decimal, parse_optional_date, parse_optional_decimal,
};

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::tradable_positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct TradablePositionDB {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub lookup_id: Option<String>,
    pub market: String,
    pub quantity: String,
    pub buy_price: String,
    pub buy_date: String,
    pub current_price: String,
    pub status: String,
    pub sell_price: Option<String>,
    pub sell_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::tradable_positions)]
#[serde(rename_all = "camelCase")]
pub struct NewTradablePositionDB {
    pub name: String,
    pub symbol: String,
    pub lookup_id: Option<String>,
    pub market: String,
    pub quantity: String,
    pub buy_price: String,
    pub buy_date: String,
    pub current_price: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl NewTradablePositionDB {
    /// Without a quoted price the position starts valued at its buy price.
    pub fn from_domain(domain: NewTradablePosition, created_at: NaiveDateTime) -> Self {
        let current_price = domain.current_price.unwrap_or(domain.buy_price);
        Self {
            name: domain.name,
            symbol: domain.symbol,
            lookup_id: domain.lookup_id,
            market: domain.market.as_str().to_string(),
            quantity: decimal_to_text(domain.quantity),
            buy_price: decimal_to_text(domain.buy_price),
            buy_date: date_to_text(domain.buy_date),
            current_price: decimal_to_text(current_price),
            status: TradableStatus::Holding.label().to_string(),
            notes: domain.notes,
            created_at: datetime_to_text(created_at),
        }
    }
}

impl From<TradablePosition> for TradablePositionDB {
    fn from(domain: TradablePosition) -> Self {
        let (sell_price, sell_date) = match &domain.status {
            TradableStatus::Holding => (None, None),
            TradableStatus::Sold {
                sell_price,
                sell_date,
            } => (Some(decimal_to_text(*sell_price)), Some(date_to_text(*sell_date))),
        };
        Self {
            id: domain.id,
            status: domain.status.label().to_string(),
            name: domain.name,
            symbol: domain.symbol,
            lookup_id: domain.lookup_id,
            market: domain.market.as_str().to_string(),
            quantity: decimal_to_text(domain.quantity),
            buy_price: decimal_to_text(domain.buy_price),
            buy_date: date_to_text(domain.buy_date),
            current_price: decimal_to_text(domain.current_price),
            sell_price,
            sell_date,
            notes: domain.notes,
            created_at: datetime_to_text(domain.created_at),
        }
    }
}

impl TryFrom<TradablePositionDB> for TradablePosition {
    type Error = StorageError;

    fn try_from(db: TradablePositionDB) -> Result<Self, Self::Error> {
        let sell_price = parse_optional_decimal("sell_price", db.sell_price.as_deref())?;
        let sell_date = parse_optional_date("sell_date", db.sell_date.as_deref())?;
        let status = match (db.status.as_str(), sell_price, sell_date) {
            ("HOLDING", None, None) => TradableStatus::Holding,
            ("SOLD", Some(sell_price), Some(sell_date)) => TradableStatus::Sold {
                sell_price,
                sell_date,
            },
            _ => return Err(mismatched_status("tradable position", db.id, &db.status)),
        };
        let market = Market::from_str(&db.market)
            .map_err(|e| StorageError::CorruptRow(format!("tradable position {}: {}", db.id, e)))?;

        Ok(Self {
            id: db.id,
            name: db.name,
            symbol: db.symbol,
            lookup_id: db.lookup_id,
            market,
            quantity: parse_decimal("quantity", &db.quantity)?,
            buy_price: parse_decimal("buy_price", &db.buy_price)?,
            buy_date: parse_date("buy_date", &db.buy_date)?,
            current_price: parse_decimal("current_price", &db.current_price)?,
            status,
            notes: db.notes,
            created_at: parse_datetime("created_at", &db.created_at)?,
        })
    }
}
