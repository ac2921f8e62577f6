use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use foliotrack_core::settings::SettingsRepositoryTrait;
use foliotrack_core::Result;

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
    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = app_settings
            .find(key)
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let setting = AppSettingDB {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(app_settings)
                    .values(&setting)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
