use async_trait::async_trait;

use crate::errors::Result;
use crate::portfolio::portfolio_model::{PortfolioSummary, Position};

/// Trait for portfolio valuation.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// All open positions for a user, each valued at the latest quote.
    async fn get_positions(&self, user_id: &str) -> Result<Vec<Position>>;

    /// Aggregate figures over the user's positions.
    async fn get_summary(&self, user_id: &str) -> Result<PortfolioSummary>;
}
