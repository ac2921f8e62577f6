//! Trade service: validation and partial-sale bookkeeping on top of the
//! repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};
use crate::trades::trades_model::{
    validate_isin, AssetKind, NewTrade, SellRequest, Trade, TradeUpdate,
};
use crate::trades::trades_traits::{TradeRepositoryTrait, TradeServiceTrait};

/// Service for managing trades.
pub struct TradeService {
    trade_repository: Arc<dyn TradeRepositoryTrait>,
}

impl TradeService {
    pub fn new(trade_repository: Arc<dyn TradeRepositoryTrait>) -> Self {
        Self { trade_repository }
    }

    fn validate_common(
        kind: AssetKind,
        symbol: &str,
        isin: Option<&str>,
        units: Decimal,
        buy_price: Decimal,
        currency: &str,
    ) -> Result<()> {
        if symbol.trim().is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }
        if units <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("units must be positive".to_string()).into(),
            );
        }
        if buy_price <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("buy price must be positive".to_string()).into(),
            );
        }
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidInput(format!(
                "invalid currency code: {}",
                currency
            ))
            .into());
        }
        match kind {
            AssetKind::Security => match isin {
                Some(isin) => validate_isin(isin)?,
                None => return Err(ValidationError::MissingField("isin".to_string()).into()),
            },
            AssetKind::Crypto => {
                if isin.is_some() {
                    return Err(ValidationError::InvalidInput(
                        "crypto trades carry no ISIN".to_string(),
                    )
                    .into());
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TradeServiceTrait for TradeService {
    fn get_trades(&self, user_id: &str) -> Result<Vec<Trade>> {
        self.trade_repository.get_trades(user_id)
    }

    fn get_trade(&self, user_id: &str, trade_id: &str) -> Result<Trade> {
        self.trade_repository.get_trade(user_id, trade_id)
    }

    async fn create_trade(&self, user_id: &str, new_trade: NewTrade) -> Result<Trade> {
        Self::validate_common(
            new_trade.kind,
            &new_trade.symbol,
            new_trade.isin.as_deref(),
            new_trade.units,
            new_trade.buy_price,
            &new_trade.currency,
        )?;

        let now = Utc::now();
        let trade = Trade {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind: new_trade.kind,
            symbol: new_trade.symbol,
            isin: new_trade.isin,
            name: new_trade.name,
            units: new_trade.units,
            buy_price: new_trade.buy_price,
            currency: new_trade.currency,
            buy_date: new_trade.buy_date,
            sold_units: Decimal::ZERO,
            realized_pl: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };
        self.trade_repository.insert_trade(trade).await
    }

    async fn update_trade(&self, user_id: &str, update: TradeUpdate) -> Result<Trade> {
        let existing = self.trade_repository.get_trade(user_id, &update.id)?;

        Self::validate_common(
            existing.kind,
            &update.symbol,
            update.isin.as_deref(),
            update.units,
            update.buy_price,
            &update.currency,
        )?;
        if update.units < existing.sold_units {
            return Err(ValidationError::InvalidInput(format!(
                "units cannot drop below the {} already sold",
                existing.sold_units
            ))
            .into());
        }

        let trade = Trade {
            symbol: update.symbol,
            isin: update.isin,
            name: update.name,
            units: update.units,
            buy_price: update.buy_price,
            currency: update.currency,
            buy_date: update.buy_date,
            updated_at: Utc::now(),
            ..existing
        };
        self.trade_repository.update_trade(trade).await
    }

    async fn delete_trade(&self, user_id: &str, trade_id: &str) -> Result<()> {
        let deleted = self.trade_repository.delete_trade(user_id, trade_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Trade {}", trade_id)));
        }
        Ok(())
    }

    async fn sell_units(&self, user_id: &str, trade_id: &str, sale: SellRequest) -> Result<Trade> {
        if sale.units <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("sale units must be positive".to_string()).into(),
            );
        }
        if sale.sell_price < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "sell price cannot be negative".to_string(),
            )
            .into());
        }

        let mut trade = self.trade_repository.get_trade(user_id, trade_id)?;
        let remaining = trade.remaining_units();
        if sale.units > remaining {
            return Err(ValidationError::InvalidInput(format!(
                "cannot sell {} units, only {} remaining",
                sale.units, remaining
            ))
            .into());
        }

        trade.sold_units += sale.units;
        trade.realized_pl += (sale.sell_price - trade.buy_price) * sale.units;
        trade.updated_at = Utc::now();
        self.trade_repository.update_trade(trade).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// In-memory repository for service tests.
    #[derive(Default)]
    struct MemoryTradeRepository {
        trades: Mutex<Vec<Trade>>,
    }

    #[async_trait]
    impl TradeRepositoryTrait for MemoryTradeRepository {
        fn get_trades(&self, user_id: &str) -> Result<Vec<Trade>> {
            let trades = self.trades.lock().unwrap();
            Ok(trades
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect())
        }

        fn get_trade(&self, user_id: &str, trade_id: &str) -> Result<Trade> {
            let trades = self.trades.lock().unwrap();
            trades
                .iter()
                .find(|t| t.user_id == user_id && t.id == trade_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Trade {}", trade_id)))
        }

        async fn insert_trade(&self, trade: Trade) -> Result<Trade> {
            let mut trades = self.trades.lock().unwrap();
            trades.push(trade.clone());
            Ok(trade)
        }

        async fn update_trade(&self, trade: Trade) -> Result<Trade> {
            let mut trades = self.trades.lock().unwrap();
            let slot = trades
                .iter_mut()
                .find(|t| t.id == trade.id)
                .ok_or_else(|| Error::NotFound(format!("Trade {}", trade.id)))?;
            *slot = trade.clone();
            Ok(trade)
        }

        async fn delete_trade(&self, user_id: &str, trade_id: &str) -> Result<usize> {
            let mut trades = self.trades.lock().unwrap();
            let before = trades.len();
            trades.retain(|t| !(t.user_id == user_id && t.id == trade_id));
            Ok(before - trades.len())
        }
    }

    fn service() -> TradeService {
        TradeService::new(Arc::new(MemoryTradeRepository::default()))
    }

    fn apple_buy() -> NewTrade {
        NewTrade {
            kind: AssetKind::Security,
            symbol: "AAPL".to_string(),
            isin: Some("US0378331005".to_string()),
            name: "Apple Inc.".to_string(),
            units: dec!(10),
            buy_price: dec!(100),
            currency: "USD".to_string(),
            buy_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_trade_assigns_id_and_zeroes_sale_fields() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();
        assert!(!trade.id.is_empty());
        assert_eq!(trade.sold_units, Decimal::ZERO);
        assert_eq!(trade.realized_pl, Decimal::ZERO);
        assert_eq!(service.get_trades("u1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_trade_rejects_bad_isin() {
        let service = service();
        let mut buy = apple_buy();
        buy.isin = Some("US0378331004".to_string());
        let err = service.create_trade("u1", buy).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidIsin(_))
        ));
    }

    #[tokio::test]
    async fn create_security_without_isin_fails() {
        let service = service();
        let mut buy = apple_buy();
        buy.isin = None;
        assert!(service.create_trade("u1", buy).await.is_err());
    }

    #[tokio::test]
    async fn create_trade_rejects_nonpositive_units() {
        let service = service();
        let mut buy = apple_buy();
        buy.units = Decimal::ZERO;
        assert!(service.create_trade("u1", buy).await.is_err());
    }

    #[tokio::test]
    async fn partial_sale_accumulates_realized_pl() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();

        let sold = service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(4),
                    sell_price: dec!(120),
                },
            )
            .await
            .unwrap();

        assert_eq!(sold.sold_units, dec!(4));
        assert_eq!(sold.realized_pl, dec!(80));
        assert_eq!(sold.remaining_units(), dec!(6));
    }

    #[tokio::test]
    async fn second_sale_adds_to_first() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();

        service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(4),
                    sell_price: dec!(120),
                },
            )
            .await
            .unwrap();
        let sold = service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(6),
                    sell_price: dec!(90),
                },
            )
            .await
            .unwrap();

        // 4 * 20 - 6 * 10 = 20
        assert_eq!(sold.realized_pl, dec!(20));
        assert!(sold.is_closed());
    }

    #[tokio::test]
    async fn selling_more_than_remaining_fails() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();

        let err = service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(11),
                    sell_price: dec!(120),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn selling_zero_units_fails() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();

        let err = service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: Decimal::ZERO,
                    sell_price: dec!(120),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn sell_is_scoped_to_user() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();

        let err = service
            .sell_units(
                "u2",
                &trade.id,
                SellRequest {
                    units: dec!(1),
                    sell_price: dec!(120),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn update_cannot_shrink_units_below_sold() {
        let service = service();
        let trade = service.create_trade("u1", apple_buy()).await.unwrap();
        service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(4),
                    sell_price: dec!(120),
                },
            )
            .await
            .unwrap();

        let update = TradeUpdate {
            id: trade.id.clone(),
            symbol: trade.symbol.clone(),
            isin: trade.isin.clone(),
            name: trade.name.clone(),
            units: dec!(3),
            buy_price: trade.buy_price,
            currency: trade.currency.clone(),
            buy_date: trade.buy_date,
        };
        assert!(service.update_trade("u1", update).await.is_err());
    }

    #[tokio::test]
    async fn delete_missing_trade_is_not_found() {
        let service = service();
        let err = service.delete_trade("u1", "nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
