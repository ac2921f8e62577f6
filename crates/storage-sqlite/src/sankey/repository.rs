use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::SankeyConfigDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sankey_configs::dsl::*;
use foliotrack_core::sankey::{SankeyConfig, SankeyRepositoryTrait};
use foliotrack_core::Result;

pub struct SankeyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SankeyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SankeyRepository { pool, writer }
    }
}

#[async_trait]
impl SankeyRepositoryTrait for SankeyRepository {
    fn get_config(&self, uid: &str) -> Result<Option<SankeyConfig>> {
        let mut conn = get_connection(&self.pool)?;
        let config_db = sankey_configs
            .find(uid)
            .first::<SankeyConfigDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        config_db.map(SankeyConfig::try_from).transpose()
    }

    async fn upsert_config(&self, uid: &str, config: SankeyConfig) -> Result<SankeyConfig> {
        let config_db =
            SankeyConfigDB::from_domain(uid, &config, &Utc::now().to_rfc3339())?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SankeyConfig> {
                diesel::replace_into(sankey_configs)
                    .values(&config_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                SankeyConfig::try_from(config_db)
            })
            .await
    }
}
