//! Fixed deposit domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ensure_not_blank, ensure_positive, Error, Result, ValidationError};
use crate::lifecycle::FixedDepositStatus;

/// Domain model representing a fixed-term deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDeposit {
    pub id: i64,
    pub name: String,
    pub invested_amount: Decimal,
    /// Annual rate in percent (7.5 means 7.5%).
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub status: FixedDepositStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl FixedDeposit {
    /// Contracted term in days.
    pub fn term_days(&self) -> i64 {
        (self.maturity_date - self.start_date).num_days()
    }

    pub fn is_matured(&self, as_of: NaiveDate) -> bool {
        as_of >= self.maturity_date
    }
}

fn validate_terms(
    interest_rate: Decimal,
    start_date: NaiveDate,
    maturity_date: NaiveDate,
) -> Result<()> {
    if interest_rate < Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Interest rate cannot be negative".to_string(),
        )));
    }
    if maturity_date <= start_date {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Maturity date {} must be after start date {}",
            maturity_date, start_date
        ))));
    }
    Ok(())
}

/// Input model for creating a new fixed deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFixedDeposit {
    pub name: String,
    pub invested_amount: Decimal,
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewFixedDeposit {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_positive("investedAmount", self.invested_amount)?;
        validate_terms(self.interest_rate, self.start_date, self.maturity_date)
    }
}

/// Descriptive edit of an open fixed deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDepositUpdate {
    pub id: i64,
    pub name: String,
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub notes: Option<String>,
}

impl FixedDepositUpdate {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        validate_terms(self.interest_rate, self.start_date, self.maturity_date)
    }

    pub fn apply_to(self, deposit: &mut FixedDeposit) {
        deposit.name = self.name;
        deposit.interest_rate = self.interest_rate;
        deposit.start_date = self.start_date;
        deposit.maturity_date = self.maturity_date;
        deposit.notes = self.notes;
    }
}

/// Correction of a closed deposit's recorded withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureAmendment {
    pub actual_withdrawal: Decimal,
    pub closed_date: NaiveDate,
    pub notes: Option<String>,
}

impl ClosureAmendment {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("actualWithdrawal", self.actual_withdrawal)
    }
}
