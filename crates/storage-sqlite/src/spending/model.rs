//! Database models for expenses and expense tags.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use wealthledger_core::spending::{Expense, ExpenseTag, NewExpense, NewExpenseTag};

use crate::errors::StorageError;
use crate::utils::{date_to_text, decimal_to_text, parse_date, parse_decimal};

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
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDB {
    pub id: i64,
    pub amount: String,
    pub date: String,
    pub category_tag_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseDB {
    pub amount: String,
    pub date: String,
    pub category_tag_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::expense_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTagDB {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::expense_tags)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseTagDB {
    pub name: String,
    pub color: Option<String>,
}

/// Link row marking an expense with an exclusion tag.
#[derive(Insertable, Queryable, Selectable, PartialEq, Eq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::expense_exclusion_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ExpenseExclusionTagDB {
    pub expense_id: i64,
    pub tag_id: i64,
}

impl From<NewExpense> for NewExpenseDB {
    fn from(domain: NewExpense) -> Self {
        Self {
            amount: decimal_to_text(domain.amount),
            date: date_to_text(domain.date),
            category_tag_id: domain.category_tag_id,
            description: domain.description,
        }
    }
}

impl From<&Expense> for ExpenseDB {
    fn from(domain: &Expense) -> Self {
        Self {
            id: domain.id,
            amount: decimal_to_text(domain.amount),
            date: date_to_text(domain.date),
            category_tag_id: domain.category_tag_id,
            description: domain.description.clone(),
        }
    }
}

impl ExpenseDB {
    pub fn into_domain(self, exclusion_tag_ids: Vec<i64>) -> Result<Expense, StorageError> {
        Ok(Expense {
            id: self.id,
            amount: parse_decimal("amount", &self.amount)?,
            date: parse_date("date", &self.date)?,
            category_tag_id: self.category_tag_id,
            exclusion_tag_ids,
            description: self.description,
        })
    }
}

impl From<ExpenseTagDB> for ExpenseTag {
    fn from(db: ExpenseTagDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            color: db.color,
        }
    }
}

impl From<NewExpenseTag> for NewExpenseTagDB {
    fn from(domain: NewExpenseTag) -> Self {
        Self {
            name: domain.name.trim().to_string(),
            color: domain.color,
        }
    }
}

/// Sorted, de-duplicated link rows for one expense.
pub fn exclusion_rows(expense_id: i64, tag_ids: &[i64]) -> Vec<ExpenseExclusionTagDB> {
    let mut ids = tag_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter()
        .map(|tag_id| ExpenseExclusionTagDB { expense_id, tag_id })
        .collect()
}
