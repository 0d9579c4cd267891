//! Non-instrument balances that contribute to net worth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ensure_not_blank, ensure_positive, Error, Result, ValidationError};
use crate::instruments::Currency;

/// Bank or wallet balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashAccount {
    pub id: i64,
    pub name: String,
    pub balance: Decimal,
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCashAccount {
    pub name: String,
    pub balance: Decimal,
    #[serde(default)]
    pub currency: Currency,
}

impl NewCashAccount {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)
    }
}

/// Manually valued INR asset (gold, property, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherAsset {
    pub id: i64,
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOtherAsset {
    pub name: String,
    pub value: Decimal,
}

impl NewOtherAsset {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        if self.value < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Asset value cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Money set aside towards a goal, in INR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
}

impl SavingsGoal {
    /// Share of the target already saved, in percent, capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.saved_amount / self.target_amount * Decimal::ONE_HUNDRED)
            .min(Decimal::ONE_HUNDRED)
            .round_dp(2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub saved_amount: Decimal,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_positive("targetAmount", self.target_amount)?;
        if self.saved_amount < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Saved amount cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}
