//! Database models for balances held outside the instrument ledger.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wealthledger_core::instruments::Currency;
use wealthledger_core::portfolio::{
    CashAccount, NewCashAccount, NewOtherAsset, NewSavingsGoal, OtherAsset, SavingsGoal,
};

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, parse_decimal};

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
#[diesel(table_name = crate::schema::cash_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CashAccountDB {
    pub id: i64,
    pub name: String,
    pub balance: String,
    pub currency: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::cash_accounts)]
#[serde(rename_all = "camelCase")]
pub struct NewCashAccountDB {
    pub name: String,
    pub balance: String,
    pub currency: String,
}

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
#[diesel(table_name = crate::schema::other_assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OtherAssetDB {
    pub id: i64,
    pub name: String,
    pub value: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::other_assets)]
#[serde(rename_all = "camelCase")]
pub struct NewOtherAssetDB {
    pub name: String,
    pub value: String,
}

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
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalDB {
    pub id: i64,
    pub name: String,
    pub target_amount: String,
    pub saved_amount: String,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_goals)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoalDB {
    pub name: String,
    pub target_amount: String,
    pub saved_amount: String,
}

impl From<NewCashAccount> for NewCashAccountDB {
    fn from(domain: NewCashAccount) -> Self {
        Self {
            name: domain.name,
            balance: decimal_to_text(domain.balance),
            currency: domain.currency.code().to_string(),
        }
    }
}

impl From<CashAccount> for CashAccountDB {
    fn from(domain: CashAccount) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            balance: decimal_to_text(domain.balance),
            currency: domain.currency.code().to_string(),
        }
    }
}

impl TryFrom<CashAccountDB> for CashAccount {
    type Error = StorageError;

    fn try_from(db: CashAccountDB) -> Result<Self, Self::Error> {
        let currency = Currency::from_str(&db.currency)
            .map_err(|e| StorageError::CorruptRow(format!("cash account {}: {}", db.id, e)))?;
        Ok(Self {
            id: db.id,
            name: db.name,
            balance: parse_decimal("balance", &db.balance)?,
            currency,
        })
    }
}

impl From<NewOtherAsset> for NewOtherAssetDB {
    fn from(domain: NewOtherAsset) -> Self {
        Self {
            name: domain.name,
            value: decimal_to_text(domain.value),
        }
    }
}

impl From<OtherAsset> for OtherAssetDB {
    fn from(domain: OtherAsset) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            value: decimal_to_text(domain.value),
        }
    }
}

impl TryFrom<OtherAssetDB> for OtherAsset {
    type Error = StorageError;

    fn try_from(db: OtherAssetDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            name: db.name,
            value: parse_decimal("value", &db.value)?,
        })
    }
}

impl From<NewSavingsGoal> for NewSavingsGoalDB {
    fn from(domain: NewSavingsGoal) -> Self {
        Self {
            name: domain.name,
            target_amount: decimal_to_text(domain.target_amount),
            saved_amount: decimal_to_text(domain.saved_amount),
        }
    }
}

impl From<SavingsGoal> for SavingsGoalDB {
    fn from(domain: SavingsGoal) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            target_amount: decimal_to_text(domain.target_amount),
            saved_amount: decimal_to_text(domain.saved_amount),
        }
    }
}

impl TryFrom<SavingsGoalDB> for SavingsGoal {
    type Error = StorageError;

    fn try_from(db: SavingsGoalDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            name: db.name,
            target_amount: parse_decimal("target_amount", &db.target_amount)?,
            saved_amount: parse_decimal("saved_amount", &db.saved_amount)?,
        })
    }
}
