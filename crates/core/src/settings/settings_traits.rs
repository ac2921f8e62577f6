use async_trait::async_trait;

use crate::errors::Result;

/// Trait for the key/value settings store.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    async fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}

/// Trait for settings operations.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// The currency all portfolio figures are reported in.
    fn base_currency(&self) -> Result<String>;
    async fn set_base_currency(&self, currency: &str) -> Result<()>;
}
