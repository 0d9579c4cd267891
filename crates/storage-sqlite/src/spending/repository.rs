use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{
    exclusion_rows, ExpenseDB, ExpenseExclusionTagDB, ExpenseTagDB, NewExpenseDB, NewExpenseTagDB,
};
use crate::db::{read_transaction, DbPool, WriteHandle};
use crate::errors::{not_found, IntoCore, StorageError};
use crate::schema::{expense_exclusion_tags, expense_tags, expenses};
use wealthledger_core::errors::Result;
use wealthledger_core::spending::{
    Expense, ExpenseRepositoryTrait, ExpenseSnapshot, ExpenseTag, NewExpense, NewExpenseTag,
};

pub struct ExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ExpenseRepository { pool, writer }
    }
}

fn exclusions_of(conn: &mut SqliteConnection, expense_id: i64) -> Result<Vec<i64>> {
    expense_exclusion_tags::table
        .filter(expense_exclusion_tags::expense_id.eq(expense_id))
        .order(expense_exclusion_tags::tag_id.asc())
        .select(expense_exclusion_tags::tag_id)
        .load::<i64>(conn)
        .into_core()
}

fn load_expense(conn: &mut SqliteConnection, expense_id: i64) -> Result<Expense> {
    let row = expenses::table
        .find(expense_id)
        .select(ExpenseDB::as_select())
        .first::<ExpenseDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| not_found("expense", expense_id))?;
    let exclusions = exclusions_of(conn, expense_id)?;
    Ok(row.into_domain(exclusions)?)
}

fn replace_exclusions(conn: &mut SqliteConnection, expense_id: i64, tag_ids: &[i64]) -> Result<()> {
    diesel::delete(
        expense_exclusion_tags::table.filter(expense_exclusion_tags::expense_id.eq(expense_id)),
    )
    .execute(conn)
    .map_err(StorageError::from)?;

    let rows = exclusion_rows(expense_id, tag_ids);
    if !rows.is_empty() {
        diesel::insert_into(expense_exclusion_tags::table)
            .values(&rows)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(())
}

/// Expenses ordered by date then id, each with its exclusion tags.
pub(crate) fn load_expense_snapshot(conn: &mut SqliteConnection) -> Result<ExpenseSnapshot> {
    let tags = expense_tags::table
        .order(expense_tags::id.asc())
        .select(ExpenseTagDB::as_select())
        .load::<ExpenseTagDB>(conn)
        .into_core()?
        .into_iter()
        .map(ExpenseTag::from)
        .collect();

    let mut exclusions: HashMap<i64, Vec<i64>> = HashMap::new();
    let links = expense_exclusion_tags::table
        .order((
            expense_exclusion_tags::expense_id.asc(),
            expense_exclusion_tags::tag_id.asc(),
        ))
        .select(ExpenseExclusionTagDB::as_select())
        .load::<ExpenseExclusionTagDB>(conn)
        .into_core()?;
    for link in links {
        exclusions.entry(link.expense_id).or_default().push(link.tag_id);
    }

    let rows = expenses::table
        .order((expenses::date.asc(), expenses::id.asc()))
        .select(ExpenseDB::as_select())
        .load::<ExpenseDB>(conn)
        .into_core()?;
    let expenses = rows
        .into_iter()
        .map(|row| {
            let tag_ids = exclusions.remove(&row.id).unwrap_or_default();
            row.into_domain(tag_ids).map_err(Into::into)
        })
        .collect::<Result<Vec<Expense>>>()?;

    Ok(ExpenseSnapshot { expenses, tags })
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    fn load_snapshot(&self) -> Result<ExpenseSnapshot> {
        read_transaction(&self.pool, load_expense_snapshot)
    }

    async fn create_expense(&self, new_expense: NewExpense) -> Result<Expense> {
        let tag_ids = new_expense.exclusion_tag_ids.clone();
        let row = NewExpenseDB::from(new_expense);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let created = diesel::insert_into(expenses::table)
                    .values(&row)
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                replace_exclusions(conn, created.id, &tag_ids)?;
                load_expense(conn, created.id)
            })
            .await
    }

    async fn update_expense(&self, expense: Expense) -> Result<Expense> {
        let row = ExpenseDB::from(&expense);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let affected = diesel::update(expenses::table.find(expense.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(not_found("expense", expense.id));
                }
                replace_exclusions(conn, expense.id, &expense.exclusion_tag_ids)?;
                load_expense(conn, expense.id)
            })
            .await
    }

    async fn delete_expense(&self, expense_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                replace_exclusions(conn, expense_id, &[])?;
                Ok(diesel::delete(expenses::table.find(expense_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn create_tag(&self, new_tag: NewExpenseTag) -> Result<ExpenseTag> {
        let row = NewExpenseTagDB::from(new_tag);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ExpenseTag> {
                let created = diesel::insert_into(expense_tags::table)
                    .values(&row)
                    .returning(ExpenseTagDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(ExpenseTag::from(created))
            })
            .await
    }

    /// Expenses categorised under the tag fall back to the unknown category.
    async fn delete_tag(&self, tag_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let recategorised = diesel::update(
                    expenses::table.filter(expenses::category_tag_id.eq(tag_id)),
                )
                .set(expenses::category_tag_id.eq(None::<i64>))
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::delete(
                    expense_exclusion_tags::table.filter(expense_exclusion_tags::tag_id.eq(tag_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                let deleted = diesel::delete(expense_tags::table.find(tag_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!(
                    "Deleted expense tag {} ({} expenses uncategorised)",
                    tag_id, recategorised
                );
                Ok(deleted)
            })
            .await
    }
}
