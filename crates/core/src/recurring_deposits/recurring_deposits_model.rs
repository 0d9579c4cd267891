//! Recurring deposit domain models.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CUSTOM_FREQUENCY_DAYS, MAX_TOTAL_INSTALLMENTS};
use crate::errors::{ensure_not_blank, ensure_positive, Error, Result, ValidationError};
use crate::lifecycle::RecurringDepositStatus;
use crate::utils::add_months_clamped;

/// Installment schedule of a recurring deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Monthly,
    Yearly,
    Custom { days: u32 },
}

impl Frequency {
    /// Date `periods` installments after `start`. Month arithmetic clamps to month end.
    pub fn advance(&self, start: NaiveDate, periods: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Monthly => add_months_clamped(start, periods),
            Frequency::Yearly => add_months_clamped(start, periods.checked_mul(12)?),
            Frequency::Custom { days } => {
                let offset = i64::from(*days) * i64::from(periods);
                start.checked_add_signed(Duration::days(offset))
            }
        }
    }

    /// Installment periods per year under the given day-count basis.
    pub fn periods_per_year(&self, day_count_basis: u32) -> Decimal {
        match self {
            Frequency::Monthly => Decimal::from(12),
            Frequency::Yearly => Decimal::ONE,
            Frequency::Custom { days } => {
                Decimal::from(day_count_basis) / Decimal::from((*days).max(1))
            }
        }
    }

    /// Length of one period in days under the given day-count basis.
    pub fn period_days(&self, day_count_basis: u32) -> Decimal {
        match self {
            Frequency::Monthly => Decimal::from(day_count_basis) / Decimal::from(12),
            Frequency::Yearly => Decimal::from(day_count_basis),
            Frequency::Custom { days } => Decimal::from(*days),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Frequency::Custom { days: 0 } => Err(Error::Validation(ValidationError::InvalidInput(
                "Custom frequency must be at least one day".to_string(),
            ))),
            Frequency::Custom { days } if *days > MAX_CUSTOM_FREQUENCY_DAYS => {
                Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Custom frequency cannot exceed {} days",
                    MAX_CUSTOM_FREQUENCY_DAYS
                ))))
            }
            _ => Ok(()),
        }
    }
}

/// Domain model representing a recurring deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDeposit {
    pub id: i64,
    pub name: String,
    pub installment_amount: Decimal,
    pub frequency: Frequency,
    /// Annual rate in percent.
    pub interest_rate: Decimal,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
    /// Fixed at creation.
    pub total_installments: u32,
    pub installments_paid: u32,
    pub last_paid_date: Option<NaiveDate>,
    pub status: RecurringDepositStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl RecurringDeposit {
    pub fn total_invested(&self) -> Decimal {
        self.installment_amount
            .saturating_mul(Decimal::from(self.installments_paid))
    }

    pub fn installments_remaining(&self) -> u32 {
        self.total_installments.saturating_sub(self.installments_paid)
    }

    /// Due date of the next unpaid installment, `None` once all are paid.
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        if self.installments_paid >= self.total_installments {
            return None;
        }
        self.frequency.advance(self.start_date, self.installments_paid)
    }

    /// One period after the last scheduled installment.
    pub fn maturity_date(&self) -> Option<NaiveDate> {
        self.frequency
            .advance(self.start_date, self.total_installments)
    }

    /// Marks the next installment as paid on `paid_date`.
    pub fn mark_installment_paid(&mut self, paid_date: NaiveDate) -> Result<()> {
        let (status, paid) = self
            .status
            .mark_installment_paid(self.installments_paid, self.total_installments)?;
        self.status = status;
        self.installments_paid = paid;
        self.last_paid_date = Some(paid_date);
        Ok(())
    }
}

/// Input model for creating a new recurring deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringDeposit {
    pub name: String,
    pub installment_amount: Decimal,
    pub frequency: Frequency,
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    pub total_installments: u32,
    /// Installments already paid before the deposit was entered.
    #[serde(default)]
    pub installments_paid: u32,
    pub notes: Option<String>,
}

impl NewRecurringDeposit {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_positive("installmentAmount", self.installment_amount)?;
        self.frequency.validate()?;
        if self.interest_rate < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Interest rate cannot be negative".to_string(),
            )));
        }
        if self.total_installments == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Total installments must be at least one".to_string(),
            )));
        }
        if self.total_installments > MAX_TOTAL_INSTALLMENTS {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Total installments cannot exceed {}",
                MAX_TOTAL_INSTALLMENTS
            ))));
        }
        if self.installments_paid > self.total_installments {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Installments paid ({}) exceeds total installments ({})",
                self.installments_paid, self.total_installments
            ))));
        }
        Ok(())
    }

    /// Initial status: completed when created fully paid.
    pub fn initial_status(&self) -> RecurringDepositStatus {
        if self.installments_paid == self.total_installments {
            RecurringDepositStatus::Completed
        } else {
            RecurringDepositStatus::Ongoing
        }
    }
}

/// Descriptive edit of an open recurring deposit. The schedule is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDepositUpdate {
    pub id: i64,
    pub name: String,
    pub interest_rate: Decimal,
    pub notes: Option<String>,
}

impl RecurringDepositUpdate {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        if self.interest_rate < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Interest rate cannot be negative".to_string(),
            )));
        }
        Ok(())
    }

    pub fn apply_to(self, deposit: &mut RecurringDeposit) {
        deposit.name = self.name;
        deposit.interest_rate = self.interest_rate;
        deposit.notes = self.notes;
    }
}
