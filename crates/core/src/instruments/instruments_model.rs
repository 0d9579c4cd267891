//! Cross-class instrument types: class/currency tags and the valued record views
//! handed to the presentation layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{CURRENCY_INR, CURRENCY_USD};
use crate::errors::{Error, ValidationError};
use crate::fixed_deposits::FixedDeposit;
use crate::lifecycle::LifecycleState;
use crate::mutual_funds::MutualFund;
use crate::recurring_deposits::RecurringDeposit;
use crate::tradables::TradablePosition;
use crate::valuation::Valuation;

/// Instrument classes tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentClass {
    FixedDeposit,
    MutualFund,
    RecurringDeposit,
    Tradable,
}

impl InstrumentClass {
    pub const ALL: [InstrumentClass; 4] = [
        InstrumentClass::FixedDeposit,
        InstrumentClass::MutualFund,
        InstrumentClass::RecurringDeposit,
        InstrumentClass::Tradable,
    ];

    /// Key used in chart series.
    pub fn key(&self) -> &'static str {
        match self {
            InstrumentClass::FixedDeposit => "fixedDeposits",
            InstrumentClass::MutualFund => "mutualFunds",
            InstrumentClass::RecurringDeposit => "recurringDeposits",
            InstrumentClass::Tradable => "tradables",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InstrumentClass::FixedDeposit => "Fixed Deposits",
            InstrumentClass::MutualFund => "Mutual Funds",
            InstrumentClass::RecurringDeposit => "Recurring Deposits",
            InstrumentClass::Tradable => "Stocks & Crypto",
        }
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstrumentClass::FixedDeposit => "fixed deposit",
            InstrumentClass::MutualFund => "mutual fund",
            InstrumentClass::RecurringDeposit => "recurring deposit",
            InstrumentClass::Tradable => "tradable position",
        };
        f.write_str(s)
    }
}

/// Currencies tracked side by side. Amounts are never converted between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => CURRENCY_INR,
            Currency::Usd => CURRENCY_USD,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            CURRENCY_INR => Ok(Currency::Inr),
            CURRENCY_USD => Ok(Currency::Usd),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unsupported currency '{}'",
                other
            )))),
        }
    }
}

/// A single instrument of any class, as read from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", content = "record", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentRecord {
    FixedDeposit(FixedDeposit),
    MutualFund(MutualFund),
    RecurringDeposit(RecurringDeposit),
    Tradable(TradablePosition),
}

impl InstrumentRecord {
    pub fn class(&self) -> InstrumentClass {
        match self {
            InstrumentRecord::FixedDeposit(_) => InstrumentClass::FixedDeposit,
            InstrumentRecord::MutualFund(_) => InstrumentClass::MutualFund,
            InstrumentRecord::RecurringDeposit(_) => InstrumentClass::RecurringDeposit,
            InstrumentRecord::Tradable(_) => InstrumentClass::Tradable,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            InstrumentRecord::FixedDeposit(fd) => fd.id,
            InstrumentRecord::MutualFund(mf) => mf.id,
            InstrumentRecord::RecurringDeposit(rd) => rd.id,
            InstrumentRecord::Tradable(tp) => tp.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            InstrumentRecord::FixedDeposit(fd) => &fd.name,
            InstrumentRecord::MutualFund(mf) => &mf.name,
            InstrumentRecord::RecurringDeposit(rd) => &rd.name,
            InstrumentRecord::Tradable(tp) => &tp.name,
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            InstrumentRecord::Tradable(tp) => tp.market.currency(),
            _ => Currency::Inr,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            InstrumentRecord::FixedDeposit(fd) => fd.status.label(),
            InstrumentRecord::MutualFund(mf) => mf.status.label(),
            InstrumentRecord::RecurringDeposit(rd) => rd.status.label(),
            InstrumentRecord::Tradable(tp) => tp.status.label(),
        }
    }

    /// Open instruments are those not yet in a terminal state.
    pub fn is_open(&self) -> bool {
        match self {
            InstrumentRecord::FixedDeposit(fd) => !fd.status.is_terminal(),
            InstrumentRecord::MutualFund(mf) => !mf.status.is_terminal(),
            InstrumentRecord::RecurringDeposit(rd) => !rd.status.is_terminal(),
            InstrumentRecord::Tradable(tp) => !tp.status.is_terminal(),
        }
    }
}

/// Full valuation record for a table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentDetail {
    pub class: InstrumentClass,
    pub currency: Currency,
    pub status: String,
    pub record: InstrumentRecord,
    pub valuation: Valuation,
}

impl InstrumentDetail {
    pub fn new(record: InstrumentRecord, valuation: Valuation) -> Self {
        Self {
            class: record.class(),
            currency: record.currency(),
            status: record.status_label().to_string(),
            record,
            valuation,
        }
    }
}

/// Per-currency totals for one class tile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTotals {
    pub invested: Decimal,
    pub current_value: Decimal,
}

/// Top-level tile for one instrument class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSummary {
    pub class: InstrumentClass,
    /// INR-denominated open instruments.
    pub total_invested: Decimal,
    pub current_value: Decimal,
    /// USD-denominated open instruments (tradables only), kept apart from INR.
    pub usd: CurrencyTotals,
    /// Number of open instruments.
    pub count: usize,
    /// Number of instruments in a terminal state.
    pub closed_count: usize,
}
