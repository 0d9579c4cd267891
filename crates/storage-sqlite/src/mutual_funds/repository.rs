use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::{InstallmentDB, MutualFundDB, NewInstallmentDB, NewMutualFundDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, IntoCore, StorageError};
use crate::schema::{mutual_fund_installments, mutual_funds};
use wealthledger_core::errors::Result;
use wealthledger_core::mutual_funds::{
    Installment, MutualFund, MutualFundRepositoryTrait, NewMutualFund,
};

pub struct MutualFundRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MutualFundRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MutualFundRepository { pool, writer }
    }
}

fn installments_of(conn: &mut SqliteConnection, fund_id: i64) -> Result<Vec<Installment>> {
    let rows = mutual_fund_installments::table
        .filter(mutual_fund_installments::fund_id.eq(fund_id))
        .order((
            mutual_fund_installments::date.asc(),
            mutual_fund_installments::id.asc(),
        ))
        .select(InstallmentDB::as_select())
        .load::<InstallmentDB>(conn)
        .into_core()?;
    rows.into_iter()
        .map(|row| Installment::try_from(row).map_err(Into::into))
        .collect()
}

pub(crate) fn load_mutual_fund(conn: &mut SqliteConnection, fund_id: i64) -> Result<MutualFund> {
    let row = mutual_funds::table
        .find(fund_id)
        .select(MutualFundDB::as_select())
        .first::<MutualFundDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| not_found("mutual fund", fund_id))?;
    let installments = installments_of(conn, fund_id)?;
    Ok(row.into_domain(installments)?)
}

pub(crate) fn load_mutual_funds(conn: &mut SqliteConnection) -> Result<Vec<MutualFund>> {
    let rows = mutual_funds::table
        .order(mutual_funds::id.asc())
        .select(MutualFundDB::as_select())
        .load::<MutualFundDB>(conn)
        .into_core()?;

    let mut ledgers: HashMap<i64, Vec<Installment>> = HashMap::new();
    let installment_rows = mutual_fund_installments::table
        .order((
            mutual_fund_installments::fund_id.asc(),
            mutual_fund_installments::date.asc(),
            mutual_fund_installments::id.asc(),
        ))
        .select(InstallmentDB::as_select())
        .load::<InstallmentDB>(conn)
        .into_core()?;
    for row in installment_rows {
        let installment = Installment::try_from(row)?;
        ledgers
            .entry(installment.fund_id)
            .or_default()
            .push(installment);
    }

    rows.into_iter()
        .map(|row| {
            let installments = ledgers.remove(&row.id).unwrap_or_default();
            row.into_domain(installments).map_err(Into::into)
        })
        .collect()
}

fn update_header(conn: &mut SqliteConnection, fund: MutualFund) -> Result<i64> {
    let fund_id = fund.id;
    let row: MutualFundDB = fund.into();
    let affected = diesel::update(mutual_funds::table.find(fund_id))
        .set(&row)
        .execute(conn)
        .map_err(StorageError::from)?;
    if affected == 0 {
        return Err(not_found("mutual fund", fund_id));
    }
    Ok(fund_id)
}

#[async_trait]
impl MutualFundRepositoryTrait for MutualFundRepository {
    fn get_by_id(&self, fund_id: i64) -> Result<MutualFund> {
        let mut conn = get_connection(&self.pool)?;
        load_mutual_fund(&mut conn, fund_id)
    }

    fn list(&self) -> Result<Vec<MutualFund>> {
        let mut conn = get_connection(&self.pool)?;
        load_mutual_funds(&mut conn)
    }

    async fn create(&self, new_fund: NewMutualFund) -> Result<MutualFund> {
        let row = NewMutualFundDB::from_domain(new_fund, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MutualFund> {
                let created = diesel::insert_into(mutual_funds::table)
                    .values(&row)
                    .returning(MutualFundDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(created.into_domain(Vec::new())?)
            })
            .await
    }

    async fn update(&self, fund: MutualFund) -> Result<MutualFund> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MutualFund> {
                let fund_id = update_header(conn, fund)?;
                load_mutual_fund(conn, fund_id)
            })
            .await
    }

    async fn append_installment(
        &self,
        fund: MutualFund,
        installment: Installment,
    ) -> Result<MutualFund> {
        let entry = NewInstallmentDB::from(&installment);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MutualFund> {
                // Header first so a missing fund fails before the ledger is touched.
                let fund_id = update_header(conn, fund)?;
                diesel::insert_into(mutual_fund_installments::table)
                    .values(&entry)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!("Appended {} installment to fund {}", entry.kind, fund_id);
                load_mutual_fund(conn, fund_id)
            })
            .await
    }

    async fn delete(&self, fund_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    mutual_fund_installments::table
                        .filter(mutual_fund_installments::fund_id.eq(fund_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(diesel::delete(mutual_funds::table.find(fund_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
