use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::TradeDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::trades;
use crate::schema::trades::dsl::*;
use foliotrack_core::trades::{Trade, TradeRepositoryTrait};
use foliotrack_core::Result;

pub struct TradeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TradeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TradeRepository { pool, writer }
    }
}

#[async_trait]
impl TradeRepositoryTrait for TradeRepository {
    fn get_trades(&self, for_user: &str) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let trades_db = trades
            .filter(user_id.eq(for_user))
            .order(buy_date.desc())
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        trades_db.into_iter().map(Trade::try_from).collect()
    }

    fn get_trade(&self, for_user: &str, trade_id: &str) -> Result<Trade> {
        let mut conn = get_connection(&self.pool)?;
        let trade_db = trades
            .filter(user_id.eq(for_user))
            .filter(id.eq(trade_id))
            .first::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Trade::try_from(trade_db)
    }

    async fn insert_trade(&self, trade: Trade) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                let trade_db: TradeDB = trade.into();
                let result_db = diesel::insert_into(trades::table)
                    .values(&trade_db)
                    .returning(TradeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Trade::try_from(result_db)
            })
            .await
    }

    async fn update_trade(&self, trade: Trade) -> Result<Trade> {
        let trade_id_owned = trade.id.clone();
        let user_id_owned = trade.user_id.clone();
        let trade_db: TradeDB = trade.into();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                let updated = diesel::update(
                    trades
                        .filter(id.eq(&trade_id_owned))
                        .filter(user_id.eq(&user_id_owned)),
                )
                .set(&trade_db)
                .execute(conn)
                .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(StorageError::QueryFailed(diesel::result::Error::NotFound).into());
                }
                let result_db = trades
                    .filter(id.eq(&trade_id_owned))
                    .first::<TradeDB>(conn)
                    .map_err(StorageError::from)?;
                Trade::try_from(result_db)
            })
            .await
    }

    async fn delete_trade(&self, for_user: &str, trade_id: &str) -> Result<usize> {
        let for_user = for_user.to_string();
        let trade_id = trade_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    trades.filter(id.eq(trade_id)).filter(user_id.eq(for_user)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
