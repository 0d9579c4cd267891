//! Database models for recurring deposits.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use wealthledger_core::lifecycle::{LifecycleState, RecurringDepositStatus};
use wealthledger_core::recurring_deposits::{Frequency, NewRecurringDeposit, RecurringDeposit};

use crate::errors::StorageError;
use crate::utils::{
    count_to_column, date_to_text, datetime_to_text, decimal_to_text, mismatched_status,
    parse_count, parse_date, parse_datetime, parse_decimal, parse_optional_date,
    parse_optional_decimal,
};

const MONTHLY: &str = "MONTHLY";
const YEARLY: &str = "YEARLY";
const CUSTOM: &str = "CUSTOM";

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
#[diesel(table_name = crate::schema::recurring_deposits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDepositDB {
    pub id: i64,
    pub name: String,
    pub installment_amount: String,
    pub frequency: String,
    pub frequency_days: Option<i32>,
    pub interest_rate: String,
    pub start_date: String,
    pub total_installments: i32,
    pub installments_paid: i32,
    pub last_paid_date: Option<String>,
    pub status: String,
    pub actual_withdrawal: Option<String>,
    pub closed_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::recurring_deposits)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringDepositDB {
    pub name: String,
    pub installment_amount: String,
    pub frequency: String,
    pub frequency_days: Option<i32>,
    pub interest_rate: String,
    pub start_date: String,
    pub total_installments: i32,
    pub installments_paid: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

fn frequency_to_columns(frequency: Frequency) -> Result<(String, Option<i32>), StorageError> {
    Ok(match frequency {
        Frequency::Monthly => (MONTHLY.to_string(), None),
        Frequency::Yearly => (YEARLY.to_string(), None),
        Frequency::Custom { days } => (
            CUSTOM.to_string(),
            Some(count_to_column("frequency_days", days)?),
        ),
    })
}

fn frequency_from_columns(
    id: i64,
    frequency: &str,
    days: Option<i32>,
) -> Result<Frequency, StorageError> {
    match (frequency, days) {
        (MONTHLY, None) => Ok(Frequency::Monthly),
        (YEARLY, None) => Ok(Frequency::Yearly),
        (CUSTOM, Some(days)) => Ok(Frequency::Custom {
            days: parse_count("frequency_days", days)?,
        }),
        _ => Err(StorageError::CorruptRow(format!(
            "recurring deposit {}: invalid frequency {} ({:?} days)",
            id, frequency, days
        ))),
    }
}

impl NewRecurringDepositDB {
    pub fn from_domain(
        domain: NewRecurringDeposit,
        created_at: NaiveDateTime,
    ) -> Result<Self, StorageError> {
        let status = domain.initial_status();
        let (frequency, frequency_days) = frequency_to_columns(domain.frequency)?;
        Ok(Self {
            name: domain.name,
            installment_amount: decimal_to_text(domain.installment_amount),
            frequency,
            frequency_days,
            interest_rate: decimal_to_text(domain.interest_rate),
            start_date: date_to_text(domain.start_date),
            total_installments: count_to_column("total_installments", domain.total_installments)?,
            installments_paid: count_to_column("installments_paid", domain.installments_paid)?,
            status: status.label().to_string(),
            notes: domain.notes,
            created_at: datetime_to_text(created_at),
        })
    }
}

impl TryFrom<RecurringDeposit> for RecurringDepositDB {
    type Error = StorageError;

    fn try_from(domain: RecurringDeposit) -> Result<Self, Self::Error> {
        let (actual_withdrawal, closed_date) = match &domain.status {
            RecurringDepositStatus::Closed {
                actual_withdrawal,
                closed_date,
            } => (
                Some(decimal_to_text(*actual_withdrawal)),
                Some(date_to_text(*closed_date)),
            ),
            RecurringDepositStatus::Ongoing | RecurringDepositStatus::Completed => (None, None),
        };
        let (frequency, frequency_days) = frequency_to_columns(domain.frequency)?;
        Ok(Self {
            id: domain.id,
            status: domain.status.label().to_string(),
            name: domain.name,
            installment_amount: decimal_to_text(domain.installment_amount),
            frequency,
            frequency_days,
            interest_rate: decimal_to_text(domain.interest_rate),
            start_date: date_to_text(domain.start_date),
            total_installments: count_to_column("total_installments", domain.total_installments)?,
            installments_paid: count_to_column("installments_paid", domain.installments_paid)?,
            last_paid_date: domain.last_paid_date.map(date_to_text),
            actual_withdrawal,
            closed_date,
            notes: domain.notes,
            created_at: datetime_to_text(domain.created_at),
        })
    }
}

impl TryFrom<RecurringDepositDB> for RecurringDeposit {
    type Error = StorageError;

    fn try_from(db: RecurringDepositDB) -> Result<Self, Self::Error> {
        let withdrawal =
            parse_optional_decimal("actual_withdrawal", db.actual_withdrawal.as_deref())?;
        let closed_date = parse_optional_date("closed_date", db.closed_date.as_deref())?;
        let status = match (db.status.as_str(), withdrawal, closed_date) {
            ("ONGOING", None, None) => RecurringDepositStatus::Ongoing,
            ("COMPLETED", None, None) => RecurringDepositStatus::Completed,
            ("CLOSED", Some(actual_withdrawal), Some(closed_date)) => {
                RecurringDepositStatus::Closed {
                    actual_withdrawal,
                    closed_date,
                }
            }
            _ => return Err(mismatched_status("recurring deposit", db.id, &db.status)),
        };

        let total_installments = parse_count("total_installments", db.total_installments)?;
        let installments_paid = parse_count("installments_paid", db.installments_paid)?;
        if installments_paid > total_installments {
            return Err(StorageError::CorruptRow(format!(
                "recurring deposit {}: {} of {} installments paid",
                db.id, installments_paid, total_installments
            )));
        }

        Ok(Self {
            id: db.id,
            name: db.name,
            installment_amount: parse_decimal("installment_amount", &db.installment_amount)?,
            frequency: frequency_from_columns(db.id, &db.frequency, db.frequency_days)?,
            interest_rate: parse_decimal("interest_rate", &db.interest_rate)?,
            start_date: parse_date("start_date", &db.start_date)?,
            total_installments,
            installments_paid,
            last_paid_date: parse_optional_date("last_paid_date", db.last_paid_date.as_deref())?,
            status,
            notes: db.notes,
            created_at: parse_datetime("created_at", &db.created_at)?,
        })
    }
}
