use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

/// Trait for currency conversion operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Exchange rate from one currency to another. Identity pairs
    /// return 1 without touching any provider.
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal>;

    /// Convert an amount between currencies.
    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal>;
}
