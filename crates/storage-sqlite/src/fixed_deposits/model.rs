//! Database models for fixed deposits.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use wealthledger_core::fixed_deposits::{FixedDeposit, NewFixedDeposit};
use wealthledger_core::lifecycle::{FixedDepositStatus, LifecycleState};

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
#[diesel(table_name = crate::schema::fixed_deposits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct FixedDepositDB {
    pub id: i64,
    pub name: String,
    pub invested_amount: String,
    pub interest_rate: String,
    pub start_date: String,
    pub maturity_date: String,
    pub status: String,
    pub actual_withdrawal: Option<String>,
    pub closed_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::fixed_deposits)]
#[serde(rename_all = "camelCase")]
pub struct NewFixedDepositDB {
    pub name: String,
    pub invested_amount: String,
    pub interest_rate: String,
    pub start_date: String,
    pub maturity_date: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl NewFixedDepositDB {
    pub fn from_domain(domain: NewFixedDeposit, created_at: chrono::NaiveDateTime) -> Self {
        Self {
            name: domain.name,
            invested_amount: decimal_to_text(domain.invested_amount),
            interest_rate: decimal_to_text(domain.interest_rate),
            start_date: date_to_text(domain.start_date),
            maturity_date: date_to_text(domain.maturity_date),
            status: FixedDepositStatus::Ongoing.label().to_string(),
            notes: domain.notes,
            created_at: datetime_to_text(created_at),
        }
    }
}

impl From<FixedDeposit> for FixedDepositDB {
    fn from(domain: FixedDeposit) -> Self {
        let (actual_withdrawal, closed_date) = match &domain.status {
            FixedDepositStatus::Ongoing => (None, None),
            FixedDepositStatus::Closed {
                actual_withdrawal,
                closed_date,
            } => (
                Some(decimal_to_text(*actual_withdrawal)),
                Some(date_to_text(*closed_date)),
            ),
        };
        Self {
            id: domain.id,
            status: domain.status.label().to_string(),
            name: domain.name,
            invested_amount: decimal_to_text(domain.invested_amount),
            interest_rate: decimal_to_text(domain.interest_rate),
            start_date: date_to_text(domain.start_date),
            maturity_date: date_to_text(domain.maturity_date),
            actual_withdrawal,
            closed_date,
            notes: domain.notes,
            created_at: datetime_to_text(domain.created_at),
        }
    }
}

impl TryFrom<FixedDepositDB> for FixedDeposit {
    type Error = StorageError;

    fn try_from(db: FixedDepositDB) -> Result<Self, Self::Error> {
        let withdrawal = parse_optional_decimal("actual_withdrawal", db.actual_withdrawal.as_deref())?;
        let closed_date = parse_optional_date("closed_date", db.closed_date.as_deref())?;
        let status = match (db.status.as_str(), withdrawal, closed_date) {
            ("ONGOING", None, None) => FixedDepositStatus::Ongoing,
            ("CLOSED", Some(actual_withdrawal), Some(closed_date)) => FixedDepositStatus::Closed {
                actual_withdrawal,
                closed_date,
            },
            _ => return Err(mismatched_status("fixed deposit", db.id, &db.status)),
        };

        Ok(Self {
            id: db.id,
            name: db.name,
            invested_amount: parse_decimal("invested_amount", &db.invested_amount)?,
            interest_rate: parse_decimal("interest_rate", &db.interest_rate)?,
            start_date: parse_date("start_date", &db.start_date)?,
            maturity_date: parse_date("maturity_date", &db.maturity_date)?,
            status,
            notes: db.notes,
            created_at: parse_datetime("created_at", &db.created_at)?,
        })
    }
}
