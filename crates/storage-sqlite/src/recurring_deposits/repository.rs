use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::{NewRecurringDepositDB, RecurringDepositDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, IntoCore, StorageError};
use crate::schema::recurring_deposits;
use wealthledger_core::errors::Result;
use wealthledger_core::recurring_deposits::{
    NewRecurringDeposit, RecurringDeposit, RecurringDepositRepositoryTrait,
};

pub struct RecurringDepositRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RecurringDepositRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RecurringDepositRepository { pool, writer }
    }
}

pub(crate) fn load_recurring_deposit(
    conn: &mut SqliteConnection,
    deposit_id: i64,
) -> Result<RecurringDeposit> {
    let row = recurring_deposits::table
        .find(deposit_id)
        .select(RecurringDepositDB::as_select())
        .first::<RecurringDepositDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| not_found("recurring deposit", deposit_id))?;
    Ok(RecurringDeposit::try_from(row)?)
}

pub(crate) fn load_recurring_deposits(conn: &mut SqliteConnection) -> Result<Vec<RecurringDeposit>> {
    let rows = recurring_deposits::table
        .order(recurring_deposits::id.asc())
        .select(RecurringDepositDB::as_select())
        .load::<RecurringDepositDB>(conn)
        .into_core()?;
    rows.into_iter()
        .map(|row| RecurringDeposit::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl RecurringDepositRepositoryTrait for RecurringDepositRepository {
    fn get_by_id(&self, deposit_id: i64) -> Result<RecurringDeposit> {
        let mut conn = get_connection(&self.pool)?;
        load_recurring_deposit(&mut conn, deposit_id)
    }

    fn list(&self) -> Result<Vec<RecurringDeposit>> {
        let mut conn = get_connection(&self.pool)?;
        load_recurring_deposits(&mut conn)
    }

    async fn create(&self, new_deposit: NewRecurringDeposit) -> Result<RecurringDeposit> {
        let row = NewRecurringDepositDB::from_domain(new_deposit, Utc::now().naive_utc())?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RecurringDeposit> {
                let created = diesel::insert_into(recurring_deposits::table)
                    .values(&row)
                    .returning(RecurringDepositDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(RecurringDeposit::try_from(created)?)
            })
            .await
    }

    async fn update(&self, deposit: RecurringDeposit) -> Result<RecurringDeposit> {
        let deposit_id = deposit.id;
        let row = RecurringDepositDB::try_from(deposit)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RecurringDeposit> {
                let affected = diesel::update(recurring_deposits::table.find(deposit_id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(not_found("recurring deposit", deposit_id));
                }
                load_recurring_deposit(conn, deposit_id)
            })
            .await
    }

    async fn delete(&self, deposit_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(recurring_deposits::table.find(deposit_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
