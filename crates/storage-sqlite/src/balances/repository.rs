use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::{
    CashAccountDB, NewCashAccountDB, NewOtherAssetDB, NewSavingsGoalDB, OtherAssetDB,
    SavingsGoalDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found, IntoCore, StorageError};
use crate::schema::{cash_accounts, other_assets, savings_goals};
use wealthledger_core::errors::Result;
use wealthledger_core::portfolio::{
    BalancesRepositoryTrait, CashAccount, NewCashAccount, NewOtherAsset, NewSavingsGoal,
    OtherAsset, SavingsGoal,
};

pub struct BalancesRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BalancesRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BalancesRepository { pool, writer }
    }
}

pub(crate) fn load_cash_accounts(conn: &mut SqliteConnection) -> Result<Vec<CashAccount>> {
    cash_accounts::table
        .order(cash_accounts::id.asc())
        .select(CashAccountDB::as_select())
        .load::<CashAccountDB>(conn)
        .into_core()?
        .into_iter()
        .map(|row| CashAccount::try_from(row).map_err(Into::into))
        .collect()
}

pub(crate) fn load_other_assets(conn: &mut SqliteConnection) -> Result<Vec<OtherAsset>> {
    other_assets::table
        .order(other_assets::id.asc())
        .select(OtherAssetDB::as_select())
        .load::<OtherAssetDB>(conn)
        .into_core()?
        .into_iter()
        .map(|row| OtherAsset::try_from(row).map_err(Into::into))
        .collect()
}

pub(crate) fn load_savings_goals(conn: &mut SqliteConnection) -> Result<Vec<SavingsGoal>> {
    savings_goals::table
        .order(savings_goals::id.asc())
        .select(SavingsGoalDB::as_select())
        .load::<SavingsGoalDB>(conn)
        .into_core()?
        .into_iter()
        .map(|row| SavingsGoal::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl BalancesRepositoryTrait for BalancesRepository {
    fn list_cash_accounts(&self) -> Result<Vec<CashAccount>> {
        let mut conn = get_connection(&self.pool)?;
        load_cash_accounts(&mut conn)
    }

    async fn create_cash_account(&self, new_account: NewCashAccount) -> Result<CashAccount> {
        let row = NewCashAccountDB::from(new_account);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CashAccount> {
                let created = diesel::insert_into(cash_accounts::table)
                    .values(&row)
                    .returning(CashAccountDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(CashAccount::try_from(created)?)
            })
            .await
    }

    async fn update_cash_account(&self, account: CashAccount) -> Result<CashAccount> {
        let row = CashAccountDB::from(account);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CashAccount> {
                let updated = diesel::update(cash_accounts::table.find(row.id))
                    .set(&row)
                    .returning(CashAccountDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| not_found("cash account", row.id))?;
                Ok(CashAccount::try_from(updated)?)
            })
            .await
    }

    async fn delete_cash_account(&self, account_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(cash_accounts::table.find(account_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn list_other_assets(&self) -> Result<Vec<OtherAsset>> {
        let mut conn = get_connection(&self.pool)?;
        load_other_assets(&mut conn)
    }

    async fn create_other_asset(&self, new_asset: NewOtherAsset) -> Result<OtherAsset> {
        let row = NewOtherAssetDB::from(new_asset);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OtherAsset> {
                let created = diesel::insert_into(other_assets::table)
                    .values(&row)
                    .returning(OtherAssetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(OtherAsset::try_from(created)?)
            })
            .await
    }

    async fn update_other_asset(&self, asset: OtherAsset) -> Result<OtherAsset> {
        let row = OtherAssetDB::from(asset);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OtherAsset> {
                let updated = diesel::update(other_assets::table.find(row.id))
                    .set(&row)
                    .returning(OtherAssetDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| not_found("other asset", row.id))?;
                Ok(OtherAsset::try_from(updated)?)
            })
            .await
    }

    async fn delete_other_asset(&self, asset_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(other_assets::table.find(asset_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        load_savings_goals(&mut conn)
    }

    async fn create_savings_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let row = NewSavingsGoalDB::from(new_goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let created = diesel::insert_into(savings_goals::table)
                    .values(&row)
                    .returning(SavingsGoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(SavingsGoal::try_from(created)?)
            })
            .await
    }

    async fn update_savings_goal(&self, goal: SavingsGoal) -> Result<SavingsGoal> {
        let row = SavingsGoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavingsGoal> {
                let updated = diesel::update(savings_goals::table.find(row.id))
                    .set(&row)
                    .returning(SavingsGoalDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| not_found("savings goal", row.id))?;
                Ok(SavingsGoal::try_from(updated)?)
            })
            .await
    }

    async fn delete_savings_goal(&self, goal_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(savings_goals::table.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
