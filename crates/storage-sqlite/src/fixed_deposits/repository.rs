use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::{FixedDepositDB, NewFixedDepositDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, IntoCore, StorageError};
use crate::schema::fixed_deposits;
use wealthledger_core::errors::Result;
use wealthledger_core::fixed_deposits::{
    FixedDeposit, FixedDepositRepositoryTrait, NewFixedDeposit,
};

pub struct FixedDepositRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FixedDepositRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        FixedDepositRepository { pool, writer }
    }
}

pub(crate) fn load_fixed_deposit(
    conn: &mut SqliteConnection,
    deposit_id: i64,
) -> Result<FixedDeposit> {
    let row = fixed_deposits::table
        .find(deposit_id)
        .select(FixedDepositDB::as_select())
        .first::<FixedDepositDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| not_found("fixed deposit", deposit_id))?;
    Ok(FixedDeposit::try_from(row)?)
}

pub(crate) fn load_fixed_deposits(conn: &mut SqliteConnection) -> Result<Vec<FixedDeposit>> {
    let rows = fixed_deposits::table
        .order(fixed_deposits::id.asc())
        .select(FixedDepositDB::as_select())
        .load::<FixedDepositDB>(conn)
        .into_core()?;
    rows.into_iter()
        .map(|row| FixedDeposit::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl FixedDepositRepositoryTrait for FixedDepositRepository {
    fn get_by_id(&self, deposit_id: i64) -> Result<FixedDeposit> {
        let mut conn = get_connection(&self.pool)?;
        load_fixed_deposit(&mut conn, deposit_id)
    }

    fn list(&self) -> Result<Vec<FixedDeposit>> {
        let mut conn = get_connection(&self.pool)?;
        load_fixed_deposits(&mut conn)
    }

    async fn create(&self, new_deposit: NewFixedDeposit) -> Result<FixedDeposit> {
        let row = NewFixedDepositDB::from_domain(new_deposit, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FixedDeposit> {
                let created = diesel::insert_into(fixed_deposits::table)
                    .values(&row)
                    .returning(FixedDepositDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(FixedDeposit::try_from(created)?)
            })
            .await
    }

    async fn update(&self, deposit: FixedDeposit) -> Result<FixedDeposit> {
        let deposit_id = deposit.id;
        let row: FixedDepositDB = deposit.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FixedDeposit> {
                let affected = diesel::update(fixed_deposits::table.find(deposit_id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(not_found("fixed deposit", deposit_id));
                }
                load_fixed_deposit(conn, deposit_id)
            })
            .await
    }

    async fn delete(&self, deposit_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(fixed_deposits::table.find(deposit_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
