//! Database model for sankey configs.
//!
//! The category lists are stored as JSON text; the monthly income as a
//! decimal string.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use foliotrack_core::errors::{Error, ValidationError};
use foliotrack_core::sankey::{SankeyCategory, SankeyConfig};

/// Database model for the per-user budget breakdown
#[derive(
    Queryable, Insertable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::sankey_configs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SankeyConfigDB {
    pub user_id: String,
    pub monthly_income: String,
    pub expenses: String,
    pub savings: String,
    pub updated_at: String,
}

impl SankeyConfigDB {
    pub fn from_domain(uid: &str, config: &SankeyConfig, saved_at: &str) -> Result<Self, Error> {
        Ok(Self {
            user_id: uid.to_string(),
            monthly_income: config.monthly_income.to_string(),
            expenses: serde_json::to_string(&config.expenses)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?,
            savings: serde_json::to_string(&config.savings)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?,
            updated_at: saved_at.to_string(),
        })
    }
}

impl TryFrom<SankeyConfigDB> for SankeyConfig {
    type Error = Error;

    fn try_from(db: SankeyConfigDB) -> Result<Self, Error> {
        let expenses: Vec<SankeyCategory> = serde_json::from_str(&db.expenses)?;
        let savings: Vec<SankeyCategory> = serde_json::from_str(&db.savings)?;
        Ok(Self {
            monthly_income: Decimal::from_str(&db.monthly_income)
                .map_err(ValidationError::DecimalParse)?,
            expenses,
            savings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn config_round_trips_through_json_columns() {
        let config = SankeyConfig {
            monthly_income: dec!(3000),
            expenses: vec![SankeyCategory {
                name: "Rent".to_string(),
                amount: dec!(1200),
            }],
            savings: vec![],
        };
        let db = SankeyConfigDB::from_domain("u1", &config, "2026-08-01T00:00:00Z").unwrap();
        assert_eq!(SankeyConfig::try_from(db).unwrap(), config);
    }
}
