//! Database models for mutual funds.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wealthledger_core::lifecycle::{LifecycleState, MutualFundStatus};
use wealthledger_core::mutual_funds::{Installment, InstallmentKind, MutualFund, NewMutualFund};

use crate::errors::StorageError;
use crate::utils::{
    date_to_text, datetime_to_text, decimal_to_text, mismatched_status, parse_date,
    parse_datetime, parse_decimal, parse_optional_date, parse_optional_decimal,
};

/// Fund header row. The installment ledger lives in its own table.
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
#[diesel(table_name = crate::schema::mutual_funds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct MutualFundDB {
    pub id: i64,
    pub name: String,
    pub scheme_code: Option<String>,
    pub sip_amount: Option<String>,
    pub start_date: String,
    pub total_units: String,
    pub current_nav: String,
    pub last_nav_date: Option<String>,
    pub total_invested: String,
    pub status: String,
    pub redeemed_amount: Option<String>,
    pub redeemed_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::mutual_funds)]
#[serde(rename_all = "camelCase")]
pub struct NewMutualFundDB {
    pub name: String,
    pub scheme_code: Option<String>,
    pub sip_amount: Option<String>,
    pub start_date: String,
    pub total_units: String,
    pub current_nav: String,
    pub total_invested: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl NewMutualFundDB {
    pub fn from_domain(domain: NewMutualFund, created_at: NaiveDateTime) -> Self {
        Self {
            name: domain.name,
            scheme_code: domain.scheme_code,
            sip_amount: domain.sip_amount.map(decimal_to_text),
            start_date: date_to_text(domain.start_date),
            total_units: "0".to_string(),
            current_nav: decimal_to_text(domain.current_nav),
            total_invested: "0".to_string(),
            status: MutualFundStatus::Ongoing.label().to_string(),
            notes: domain.notes,
            created_at: datetime_to_text(created_at),
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::mutual_fund_installments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct InstallmentDB {
    pub id: i64,
    pub fund_id: i64,
    pub date: String,
    pub amount: String,
    pub nav_at_purchase: String,
    pub units: String,
    pub kind: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::mutual_fund_installments)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallmentDB {
    pub fund_id: i64,
    pub date: String,
    pub amount: String,
    pub nav_at_purchase: String,
    pub units: String,
    pub kind: String,
}

impl From<&Installment> for NewInstallmentDB {
    fn from(domain: &Installment) -> Self {
        Self {
            fund_id: domain.fund_id,
            date: date_to_text(domain.date),
            amount: decimal_to_text(domain.amount),
            nav_at_purchase: decimal_to_text(domain.nav_at_purchase),
            units: decimal_to_text(domain.units),
            kind: domain.kind.as_str().to_string(),
        }
    }
}

impl TryFrom<InstallmentDB> for Installment {
    type Error = StorageError;

    fn try_from(db: InstallmentDB) -> Result<Self, Self::Error> {
        let kind = InstallmentKind::from_str(&db.kind)
            .map_err(|e| StorageError::CorruptRow(format!("installment {}: {}", db.id, e)))?;
        Ok(Self {
            id: Some(db.id),
            fund_id: db.fund_id,
            date: parse_date("date", &db.date)?,
            amount: parse_decimal("amount", &db.amount)?,
            nav_at_purchase: parse_decimal("nav_at_purchase", &db.nav_at_purchase)?,
            units: parse_decimal("units", &db.units)?,
            kind,
        })
    }
}

impl From<MutualFund> for MutualFundDB {
    fn from(domain: MutualFund) -> Self {
        let (redeemed_amount, redeemed_date) = match &domain.status {
            MutualFundStatus::Redeemed {
                redeemed_amount,
                redeemed_date,
            } => (
                Some(decimal_to_text(*redeemed_amount)),
                Some(date_to_text(*redeemed_date)),
            ),
            MutualFundStatus::Ongoing | MutualFundStatus::Paused => (None, None),
        };
        Self {
            id: domain.id,
            status: domain.status.label().to_string(),
            name: domain.name,
            scheme_code: domain.scheme_code,
            sip_amount: domain.sip_amount.map(decimal_to_text),
            start_date: date_to_text(domain.start_date),
            total_units: decimal_to_text(domain.total_units),
            current_nav: decimal_to_text(domain.current_nav),
            last_nav_date: domain.last_nav_date.map(date_to_text),
            total_invested: decimal_to_text(domain.total_invested),
            redeemed_amount,
            redeemed_date,
            notes: domain.notes,
            created_at: datetime_to_text(domain.created_at),
        }
    }
}

impl MutualFundDB {
    /// Rebuilds the domain fund with its ledger.
    pub fn into_domain(self, installments: Vec<Installment>) -> Result<MutualFund, StorageError> {
        let amount = parse_optional_decimal("redeemed_amount", self.redeemed_amount.as_deref())?;
        let date = parse_optional_date("redeemed_date", self.redeemed_date.as_deref())?;
        let status = match (self.status.as_str(), amount, date) {
            ("ONGOING", None, None) => MutualFundStatus::Ongoing,
            ("PAUSED", None, None) => MutualFundStatus::Paused,
            ("REDEEMED", Some(redeemed_amount), Some(redeemed_date)) => MutualFundStatus::Redeemed {
                redeemed_amount,
                redeemed_date,
            },
            _ => return Err(mismatched_status("mutual fund", self.id, &self.status)),
        };

        Ok(MutualFund {
            id: self.id,
            name: self.name,
            scheme_code: self.scheme_code,
            sip_amount: parse_optional_decimal("sip_amount", self.sip_amount.as_deref())?,
            start_date: parse_date("start_date", &self.start_date)?,
            total_units: parse_decimal("total_units", &self.total_units)?,
            current_nav: parse_decimal("current_nav", &self.current_nav)?,
            last_nav_date: parse_optional_date("last_nav_date", self.last_nav_date.as_deref())?,
            total_invested: parse_decimal("total_invested", &self.total_invested)?,
            status,
            notes: self.notes,
            created_at: parse_datetime("created_at", &self.created_at)?,
            installments,
        })
    }
}
