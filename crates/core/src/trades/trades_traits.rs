use async_trait::async_trait;

use crate::errors::Result;
use crate::trades::trades_model::{NewTrade, SellRequest, Trade, TradeUpdate};

/// Trait for trade repository operations. Implemented by the storage layer.
#[async_trait]
pub trait TradeRepositoryTrait: Send + Sync {
    fn get_trades(&self, user_id: &str) -> Result<Vec<Trade>>;
    fn get_trade(&self, user_id: &str, trade_id: &str) -> Result<Trade>;
    async fn insert_trade(&self, trade: Trade) -> Result<Trade>;
    async fn update_trade(&self, trade: Trade) -> Result<Trade>;
    async fn delete_trade(&self, user_id: &str, trade_id: &str) -> Result<usize>;
}

/// Trait for trade service operations.
#[async_trait]
pub trait TradeServiceTrait: Send + Sync {
    fn get_trades(&self, user_id: &str) -> Result<Vec<Trade>>;
    fn get_trade(&self, user_id: &str, trade_id: &str) -> Result<Trade>;
    async fn create_trade(&self, user_id: &str, new_trade: NewTrade) -> Result<Trade>;
    async fn update_trade(&self, user_id: &str, update: TradeUpdate) -> Result<Trade>;
    async fn delete_trade(&self, user_id: &str, trade_id: &str) -> Result<()>;
    async fn sell_units(&self, user_id: &str, trade_id: &str, sale: SellRequest) -> Result<Trade>;
}
