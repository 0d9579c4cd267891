//! Unit-based position (SIP / mutual fund) domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{ensure_not_blank, ensure_positive, Error, Result, ValidationError};
use crate::lifecycle::MutualFundStatus;

/// Kind of contribution recorded in the installment ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentKind {
    Recurring,
    Lumpsum,
}

impl InstallmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentKind::Recurring => "RECURRING",
            InstallmentKind::Lumpsum => "LUMPSUM",
        }
    }
}

impl FromStr for InstallmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RECURRING" => Ok(InstallmentKind::Recurring),
            "LUMPSUM" => Ok(InstallmentKind::Lumpsum),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown installment kind '{}'",
                other
            )))),
        }
    }
}

/// One entry of the append-only installment ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Assigned by the ledger store; `None` until persisted.
    pub id: Option<i64>,
    pub fund_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub nav_at_purchase: Decimal,
    /// `amount / nav_at_purchase`, kept unrounded.
    pub units: Decimal,
    pub kind: InstallmentKind,
}

/// Input for a new installment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallment {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub nav_at_purchase: Decimal,
    pub kind: InstallmentKind,
}

impl NewInstallment {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("amount", self.amount)?;
        ensure_positive("navAtPurchase", self.nav_at_purchase)
    }
}

/// Domain model representing a unit-based position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualFund {
    pub id: i64,
    pub name: String,
    /// Identifier understood by the NAV resolver (e.g. an AMFI scheme code).
    pub scheme_code: Option<String>,
    /// Planned recurring contribution, descriptive only.
    pub sip_amount: Option<Decimal>,
    pub start_date: NaiveDate,
    pub total_units: Decimal,
    pub current_nav: Decimal,
    pub last_nav_date: Option<NaiveDate>,
    pub total_invested: Decimal,
    pub status: MutualFundStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub installments: Vec<Installment>,
}

impl MutualFund {
    /// Validates and applies an installment. Units and invested amount change
    /// together or not at all; the returned entry must be appended to the ledger.
    pub fn apply_installment(&mut self, input: NewInstallment) -> Result<Installment> {
        input.validate()?;
        self.status
            .ensure_accepts_installment(input.kind == InstallmentKind::Recurring)?;

        let units = input.amount / input.nav_at_purchase;
        let installment = Installment {
            id: None,
            fund_id: self.id,
            date: input.date,
            amount: input.amount,
            nav_at_purchase: input.nav_at_purchase,
            units,
            kind: input.kind,
        };

        self.total_units += units;
        self.total_invested += input.amount;
        self.installments.push(installment.clone());
        Ok(installment)
    }

    /// Records a new NAV. Rejected once redeemed.
    pub fn update_nav(&mut self, nav: Decimal, date: NaiveDate) -> Result<()> {
        ensure_positive("nav", nav)?;
        self.status.ensure_accepts_nav_update()?;
        self.current_nav = nav;
        self.last_nav_date = Some(date);
        Ok(())
    }

    /// Totals re-derived from the installment ledger: (units, invested).
    pub fn ledger_totals(&self) -> (Decimal, Decimal) {
        self.installments
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(units, invested), i| {
                (units + i.units, invested + i.amount)
            })
    }
}

/// Input model for creating a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMutualFund {
    pub name: String,
    pub scheme_code: Option<String>,
    pub sip_amount: Option<Decimal>,
    pub start_date: NaiveDate,
    pub current_nav: Decimal,
    pub notes: Option<String>,
}

impl NewMutualFund {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        ensure_positive("currentNav", self.current_nav)?;
        if let Some(sip) = self.sip_amount {
            ensure_positive("sipAmount", sip)?;
        }
        Ok(())
    }
}

/// Descriptive edit of an open position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualFundUpdate {
    pub id: i64,
    pub name: String,
    pub scheme_code: Option<String>,
    pub sip_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl MutualFundUpdate {
    pub fn validate(&self) -> Result<()> {
        ensure_not_blank("name", &self.name)?;
        if let Some(sip) = self.sip_amount {
            ensure_positive("sipAmount", sip)?;
        }
        Ok(())
    }

    pub fn apply_to(self, fund: &mut MutualFund) {
        fund.name = self.name;
        fund.scheme_code = self.scheme_code;
        fund.sip_amount = self.sip_amount;
        fund.notes = self.notes;
    }
}
