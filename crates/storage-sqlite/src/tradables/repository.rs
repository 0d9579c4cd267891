use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::{NewTradablePositionDB, TradablePositionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, IntoCore, StorageError};
use crate::schema::tradable_positions;
use wealthledger_core::errors::Result;
use wealthledger_core::tradables::{
    NewTradablePosition, TradablePosition, TradableRepositoryTrait,
};

pub struct TradableRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TradableRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TradableRepository { pool, writer }
    }
}

pub(crate) fn load_tradable_position(
    conn: &mut SqliteConnection,
    position_id: i64,
) -> Result<TradablePosition> {
    let row = tradable_positions::table
        .find(position_id)
        .select(TradablePositionDB::as_select())
        .first::<TradablePositionDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| not_found("tradable position", position_id))?;
    Ok(TradablePosition::try_from(row)?)
}

pub(crate) fn load_tradable_positions(conn: &mut SqliteConnection) -> Result<Vec<TradablePosition>> {
    let rows = tradable_positions::table
        .order(tradable_positions::id.asc())
        .select(TradablePositionDB::as_select())
        .load::<TradablePositionDB>(conn)
        .into_core()?;
    rows.into_iter()
        .map(|row| TradablePosition::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl TradableRepositoryTrait for TradableRepository {
    fn get_by_id(&self, position_id: i64) -> Result<TradablePosition> {
        let mut conn = get_connection(&self.pool)?;
        load_tradable_position(&mut conn, position_id)
    }

    fn list(&self) -> Result<Vec<TradablePosition>> {
        let mut conn = get_connection(&self.pool)?;
        load_tradable_positions(&mut conn)
    }

    async fn create(&self, new_position: NewTradablePosition) -> Result<TradablePosition> {
        let row = NewTradablePositionDB::from_domain(new_position, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<TradablePosition> {
                let created = diesel::insert_into(tradable_positions::table)
                    .values(&row)
                    .returning(TradablePositionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(TradablePosition::try_from(created)?)
            })
            .await
    }

    async fn update(&self, position: TradablePosition) -> Result<TradablePosition> {
        let position_id = position.id;
        let row: TradablePositionDB = position.into();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<TradablePosition> {
                let affected = diesel::update(tradable_positions::table.find(position_id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(not_found("tradable position", position_id));
                }
                load_tradable_position(conn, position_id)
            })
            .await
    }

    async fn delete(&self, position_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(tradable_positions::table.find(position_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
