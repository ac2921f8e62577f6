//! Database model for trades.
//!
//! Monetary fields and timestamps are stored as TEXT: decimals in their
//! canonical string form, timestamps as RFC 3339.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foliotrack_core::errors::{Error, ValidationError};
use foliotrack_core::trades::{AssetKind, Trade};

/// Database model for trades
#[derive(
    Queryable,
    Insertable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TradeDB {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub symbol: String,
    pub isin: Option<String>,
    pub name: String,
    pub units: String,
    pub buy_price: String,
    pub currency: String,
    pub buy_date: String,
    pub sold_units: String,
    pub realized_pl: String,
    pub created_at: String,
    pub updated_at: String,
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(ValidationError::DateTimeParse)?
        .with_timezone(&Utc))
}

// Conversion to the domain model; TEXT columns make this fallible.
impl TryFrom<TradeDB> for Trade {
    type Error = Error;

    fn try_from(db: TradeDB) -> Result<Self, Error> {
        let kind = AssetKind::from_db_str(&db.kind).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "unknown asset kind '{}'",
                db.kind
            )))
        })?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            kind,
            symbol: db.symbol,
            isin: db.isin,
            name: db.name,
            units: Decimal::from_str(&db.units).map_err(ValidationError::DecimalParse)?,
            buy_price: Decimal::from_str(&db.buy_price).map_err(ValidationError::DecimalParse)?,
            currency: db.currency,
            buy_date: parse_timestamp(&db.buy_date)?,
            sold_units: Decimal::from_str(&db.sold_units)
                .map_err(ValidationError::DecimalParse)?,
            realized_pl: Decimal::from_str(&db.realized_pl)
                .map_err(ValidationError::DecimalParse)?,
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
        })
    }
}

impl From<Trade> for TradeDB {
    fn from(domain: Trade) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            kind: domain.kind.as_db_str().to_string(),
            symbol: domain.symbol,
            isin: domain.isin,
            name: domain.name,
            units: domain.units.to_string(),
            buy_price: domain.buy_price.to_string(),
            currency: domain.currency,
            buy_date: domain.buy_date.to_rfc3339(),
            sold_units: domain.sold_units.to_string(),
            realized_pl: domain.realized_pl.to_string(),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn domain_round_trips_through_db_model() {
        let trade = Trade {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            kind: AssetKind::Security,
            symbol: "SAP".to_string(),
            isin: Some("DE0007164600".to_string()),
            name: "SAP SE".to_string(),
            units: dec!(2.5),
            buy_price: dec!(120.10),
            currency: "EUR".to_string(),
            buy_date: Utc::now(),
            sold_units: dec!(0.5),
            realized_pl: dec!(-3.05),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let restored = Trade::try_from(TradeDB::from(trade.clone())).unwrap();
        assert_eq!(restored, trade);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut db = TradeDB::from(Trade {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            kind: AssetKind::Crypto,
            symbol: "bitcoin".to_string(),
            isin: None,
            name: "Bitcoin".to_string(),
            units: dec!(1),
            buy_price: dec!(20000),
            currency: "EUR".to_string(),
            buy_date: Utc::now(),
            sold_units: dec!(0),
            realized_pl: dec!(0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        db.kind = "BOND".to_string();
        assert!(Trade::try_from(db).is_err());
    }
}
