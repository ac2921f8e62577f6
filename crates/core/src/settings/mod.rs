//! Settings module - key/value application settings.

mod settings_service;
mod settings_traits;

pub use settings_service::SettingsService;
pub use settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};
