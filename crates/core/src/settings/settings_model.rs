//! Engine settings - the typed view over the key/value settings table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_DAY_COUNT_BASIS;
use crate::errors::Error;

pub const FD_INTEREST_MODE_KEY: &str = "fd_interest_mode";
pub const RD_COMPOUNDING_KEY: &str = "rd_compounding";
pub const DAY_COUNT_BASIS_KEY: &str = "day_count_basis";
pub const PRICE_REFRESH_DELAY_MS_KEY: &str = "price_refresh_delay_ms";

/// Default pause between sequential resolver calls during a bulk refresh.
pub const DEFAULT_PRICE_REFRESH_DELAY_MS: u64 = 250;

/// Interest formula used for fixed-deposit maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterestMode {
    #[default]
    Simple,
    CompoundMonthly,
    CompoundQuarterly,
    CompoundHalfYearly,
    CompoundYearly,
}

impl InterestMode {
    /// Compounding periods per year, `None` for simple interest.
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            InterestMode::Simple => None,
            InterestMode::CompoundMonthly => Some(12),
            InterestMode::CompoundQuarterly => Some(4),
            InterestMode::CompoundHalfYearly => Some(2),
            InterestMode::CompoundYearly => Some(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterestMode::Simple => "simple",
            InterestMode::CompoundMonthly => "compound_monthly",
            InterestMode::CompoundQuarterly => "compound_quarterly",
            InterestMode::CompoundHalfYearly => "compound_half_yearly",
            InterestMode::CompoundYearly => "compound_yearly",
        }
    }
}

impl fmt::Display for InterestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "simple" => Ok(InterestMode::Simple),
            "compound_monthly" => Ok(InterestMode::CompoundMonthly),
            "compound_quarterly" => Ok(InterestMode::CompoundQuarterly),
            "compound_half_yearly" => Ok(InterestMode::CompoundHalfYearly),
            "compound_yearly" => Ok(InterestMode::CompoundYearly),
            other => Err(Error::InvalidConfigValue(format!(
                "{}: unknown interest mode '{}'",
                FD_INTEREST_MODE_KEY, other
            ))),
        }
    }
}

/// Maturity formula for recurring deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RdCompounding {
    /// Interest compounds once per installment period.
    #[default]
    PerInstallment,
    /// Interest compounds quarterly, simple interest on the trailing partial quarter.
    Quarterly,
}

impl RdCompounding {
    pub fn as_str(&self) -> &'static str {
        match self {
            RdCompounding::PerInstallment => "per_installment",
            RdCompounding::Quarterly => "quarterly",
        }
    }
}

impl FromStr for RdCompounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per_installment" => Ok(RdCompounding::PerInstallment),
            "quarterly" => Ok(RdCompounding::Quarterly),
            other => Err(Error::InvalidConfigValue(format!(
                "{}: unknown compounding '{}'",
                RD_COMPOUNDING_KEY, other
            ))),
        }
    }
}

/// Settings that influence valuation and bulk refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    pub fd_interest_mode: InterestMode,
    pub rd_compounding: RdCompounding,
    pub day_count_basis: u32,
    pub price_refresh_delay_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fd_interest_mode: InterestMode::Simple,
            rd_compounding: RdCompounding::PerInstallment,
            day_count_basis: DEFAULT_DAY_COUNT_BASIS,
            price_refresh_delay_ms: DEFAULT_PRICE_REFRESH_DELAY_MS,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettingsUpdate {
    pub fd_interest_mode: Option<InterestMode>,
    pub rd_compounding: Option<RdCompounding>,
    pub day_count_basis: Option<u32>,
    pub price_refresh_delay_ms: Option<u64>,
}
