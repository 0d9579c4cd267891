use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::app_settings::dsl::*;
use wealthledger_core::errors::{DatabaseError, Error, Result};
use wealthledger_core::settings::SettingsRepositoryTrait;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_all_settings(&self) -> Result<Vec<(String, String)>> {
        let mut conn = get_connection(&self.pool)?;
        app_settings
            .select((setting_key, setting_value))
            .order(setting_key.asc())
            .load::<(String, String)>(&mut conn)
            .into_core()
    }

    fn get_setting(&self, key: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        app_settings
            .filter(setting_key.eq(key))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(format!("setting {}", key))))
    }

    async fn update_setting(&self, key: &str, value: &str) -> Result<()> {
        let row = AppSettingDB {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
        };
        self.writer
            .exec(move |conn| {
                debug!("Storing setting {} = {}", row.setting_key, row.setting_value);
                diesel::replace_into(app_settings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
