use async_trait::async_trait;

use crate::errors::Result;
use crate::sankey::sankey_model::SankeyConfig;

/// Trait for the sankey config store. One row per user.
#[async_trait]
pub trait SankeyRepositoryTrait: Send + Sync {
    fn get_config(&self, user_id: &str) -> Result<Option<SankeyConfig>>;
    async fn upsert_config(&self, user_id: &str, config: SankeyConfig) -> Result<SankeyConfig>;
}

/// Trait for sankey config operations.
#[async_trait]
pub trait SankeyServiceTrait: Send + Sync {
    fn get_config(&self, user_id: &str) -> Result<Option<SankeyConfig>>;
    async fn save_config(&self, user_id: &str, config: SankeyConfig) -> Result<SankeyConfig>;
}
