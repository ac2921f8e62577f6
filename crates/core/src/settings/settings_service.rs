use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::{BASE_CURRENCY_SETTING, DEFAULT_BASE_CURRENCY};
use crate::errors::{Result, ValidationError};
use crate::settings::settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};

/// Service for application settings.
pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self {
            settings_repository,
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn base_currency(&self) -> Result<String> {
        Ok(self
            .settings_repository
            .get_setting(BASE_CURRENCY_SETTING)?
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string()))
    }

    async fn set_base_currency(&self, currency: &str) -> Result<()> {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidInput(format!(
                "invalid currency code: {}",
                currency
            ))
            .into());
        }
        self.settings_repository
            .set_setting(BASE_CURRENCY_SETTING, currency)
            .await
    }
}
