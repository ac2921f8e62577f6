use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};
use crate::sankey::sankey_model::{SankeyCategory, SankeyConfig};
use crate::sankey::sankey_traits::{SankeyRepositoryTrait, SankeyServiceTrait};

/// Service for the budget breakdown.
pub struct SankeyService {
    sankey_repository: Arc<dyn SankeyRepositoryTrait>,
}

impl SankeyService {
    pub fn new(sankey_repository: Arc<dyn SankeyRepositoryTrait>) -> Self {
        Self { sankey_repository }
    }

    fn validate_categories(kind: &str, categories: &[SankeyCategory]) -> Result<()> {
        let mut seen = HashSet::new();
        for category in categories {
            if category.name.trim().is_empty() {
                return Err(ValidationError::InvalidInput(format!(
                    "{} category name cannot be empty",
                    kind
                ))
                .into());
            }
            if category.amount < Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "{} category '{}' has a negative amount",
                    kind, category.name
                ))
                .into());
            }
            if !seen.insert(category.name.trim().to_lowercase()) {
                return Err(ValidationError::InvalidInput(format!(
                    "duplicate {} category '{}'",
                    kind, category.name
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate(config: &SankeyConfig) -> Result<()> {
        if config.monthly_income < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "monthly income cannot be negative".to_string(),
            )
            .into());
        }
        Self::validate_categories("expense", &config.expenses)?;
        Self::validate_categories("savings", &config.savings)?;
        Ok(())
    }
}

#[async_trait]
impl SankeyServiceTrait for SankeyService {
    fn get_config(&self, user_id: &str) -> Result<Option<SankeyConfig>> {
        self.sankey_repository.get_config(user_id)
    }

    async fn save_config(&self, user_id: &str, config: SankeyConfig) -> Result<SankeyConfig> {
        Self::validate(&config)?;
        self.sankey_repository.upsert_config(user_id, config).await
    }
}
