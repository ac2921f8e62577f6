//! Portfolio valuation: joins trades with live quotes and FX rates.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::portfolio::portfolio_model::{PortfolioSummary, Position};
use crate::portfolio::portfolio_traits::PortfolioServiceTrait;
use crate::quotes::QuoteServiceTrait;
use crate::settings::SettingsServiceTrait;
use crate::trades::{Trade, TradeRepositoryTrait};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Service computing positions and summaries.
pub struct PortfolioService {
    trade_repository: Arc<dyn TradeRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        trade_repository: Arc<dyn TradeRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            trade_repository,
            quote_service,
            fx_service,
            settings_service,
        }
    }

    /// Value one trade. A quote or FX failure degrades the position to
    /// `quote_missing`/`fx_missing` instead of failing the whole
    /// portfolio.
    async fn build_position(&self, trade: &Trade, base_currency: &str) -> Position {
        let units = trade.remaining_units();
        let invested = match self
            .fx_service
            .convert(units * trade.buy_price, &trade.currency, base_currency)
            .await
        {
            Ok(amount) => Some(amount),
            Err(e) => {
                warn!(
                    "No FX rate {}->{} for {}: {}",
                    trade.currency, base_currency, trade.id, e
                );
                None
            }
        };
        // Same pair as above; only retried when that one succeeded.
        let realized_pl = match invested {
            Some(_) => self
                .fx_service
                .convert(trade.realized_pl, &trade.currency, base_currency)
                .await
                .ok(),
            None => None,
        };

        let quote = match self.quote_service.get_quote(&trade.instrument()).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("No quote for {} ({}): {}", trade.symbol, trade.id, e);
                None
            }
        };

        let mut position = Position {
            trade_id: trade.id.clone(),
            kind: trade.kind,
            symbol: trade.symbol.clone(),
            isin: trade.isin.clone(),
            name: trade.name.clone(),
            units,
            buy_price: trade.buy_price,
            trade_currency: trade.currency.clone(),
            buy_date: trade.buy_date,
            invested,
            current_value: None,
            pl_abs: None,
            pl_pct: None,
            realized_pl,
            quote_missing: quote.is_none(),
            quote_source: None,
            fx_missing: invested.is_none(),
        };

        if let (Some(quote), Some(invested)) = (quote, invested) {
            match self
                .fx_service
                .convert(units * quote.price, &quote.currency, base_currency)
                .await
            {
                Ok(value) => {
                    let pl_abs = value - invested;
                    let pl_pct = if invested.is_zero() {
                        Decimal::ZERO
                    } else {
                        pl_abs / invested * HUNDRED
                    };
                    position.current_value = Some(value);
                    position.pl_abs = Some(pl_abs);
                    position.pl_pct = Some(pl_pct);
                    position.quote_source = Some(quote.source);
                }
                Err(e) => {
                    warn!(
                        "No FX rate {}->{} for {}: {}",
                        quote.currency, base_currency, trade.id, e
                    );
                    position.fx_missing = true;
                }
            }
        }

        position
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn get_positions(&self, user_id: &str) -> Result<Vec<Position>> {
        let base_currency = self.settings_service.base_currency()?;
        let trades = self.trade_repository.get_trades(user_id)?;

        let mut positions = Vec::with_capacity(trades.len());
        for trade in trades.iter().filter(|t| !t.is_closed()) {
            positions.push(self.build_position(trade, &base_currency).await);
        }
        Ok(positions)
    }

    async fn get_summary(&self, user_id: &str) -> Result<PortfolioSummary> {
        let base_currency = self.settings_service.base_currency()?;
        let trades = self.trade_repository.get_trades(user_id)?;

        let mut total_invested = Decimal::ZERO;
        let mut total_value = Decimal::ZERO;
        let mut total_realized_pl = Decimal::ZERO;
        let mut positions = 0usize;
        let mut quotes_missing = 0usize;
        let mut fx_missing = 0usize;

        for trade in &trades {
            if trade.is_closed() {
                // Closed trades only contribute their realized P/L.
                match self
                    .fx_service
                    .convert(trade.realized_pl, &trade.currency, &base_currency)
                    .await
                {
                    Ok(amount) => total_realized_pl += amount,
                    Err(e) => {
                        warn!(
                            "No FX rate {}->{} for {}: {}",
                            trade.currency, base_currency, trade.id, e
                        );
                        fx_missing += 1;
                    }
                }
                continue;
            }

            positions += 1;
            let position = self.build_position(trade, &base_currency).await;
            if let Some(realized) = position.realized_pl {
                total_realized_pl += realized;
            }
            if position.fx_missing {
                fx_missing += 1;
            }
            match (position.invested, position.current_value) {
                (Some(invested), Some(value)) => {
                    total_invested += invested;
                    total_value += value;
                }
                _ if position.quote_missing => quotes_missing += 1,
                _ => {}
            }
        }

        let total_pl_abs = total_value - total_invested;
        let total_pl_pct = if total_invested.is_zero() {
            Decimal::ZERO
        } else {
            total_pl_abs / total_invested * HUNDRED
        };

        Ok(PortfolioSummary {
            base_currency,
            total_invested,
            total_value,
            total_pl_abs,
            total_pl_pct,
            total_realized_pl,
            positions,
            quotes_missing,
            fx_missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::trades::{AssetKind, NewTrade, SellRequest, TradeService, TradeServiceTrait};
    use chrono::Utc;
    use foliotrack_market_data::{Instrument, MarketDataError, MarketIndex, Quote};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

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
            self.trades.lock().unwrap().push(trade.clone());
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

    /// Quotes from a fixed table; unknown symbols fail like a provider
    /// miss would.
    #[derive(Default)]
    struct TableQuotes {
        prices: HashMap<String, (Decimal, String)>,
    }

    #[async_trait]
    impl QuoteServiceTrait for TableQuotes {
        async fn get_quote(&self, instrument: &Instrument) -> Result<Quote> {
            let symbol = instrument.display_symbol();
            match self.prices.get(symbol) {
                Some((price, currency)) => Ok(Quote::new(symbol, *price, currency, "TEST")),
                None => Err(MarketDataError::SymbolNotFound(symbol.to_string()).into()),
            }
        }

        async fn get_index(&self, _symbol: &str, _name: &str) -> Result<MarketIndex> {
            unimplemented!("not used in portfolio tests")
        }
    }

    /// Fixed USD->EUR rate; every other pair is identity.
    struct FlatFx {
        usd_to_eur: Decimal,
    }

    #[async_trait]
    impl FxServiceTrait for FlatFx {
        async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal> {
            if from == to {
                Ok(Decimal::ONE)
            } else if from == "USD" && to == "EUR" {
                Ok(self.usd_to_eur)
            } else {
                Err(Error::CurrencyConversionFailed(format!("{}->{}", from, to)))
            }
        }

        async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal> {
            Ok(amount * self.get_rate(from, to).await?)
        }
    }

    struct FixedSettings;

    #[async_trait]
    impl SettingsServiceTrait for FixedSettings {
        fn base_currency(&self) -> Result<String> {
            Ok("EUR".to_string())
        }

        async fn set_base_currency(&self, _currency: &str) -> Result<()> {
            Ok(())
        }
    }

    struct Fixture {
        trade_service: TradeService,
        portfolio_service: PortfolioService,
    }

    fn fixture(prices: &[(&str, Decimal, &str)]) -> Fixture {
        let repository = Arc::new(MemoryTradeRepository::default());
        let quotes = Arc::new(TableQuotes {
            prices: prices
                .iter()
                .map(|(s, p, c)| (s.to_string(), (*p, c.to_string())))
                .collect(),
        });
        let fx = Arc::new(FlatFx {
            usd_to_eur: dec!(0.9),
        });
        Fixture {
            trade_service: TradeService::new(repository.clone()),
            portfolio_service: PortfolioService::new(
                repository,
                quotes,
                fx,
                Arc::new(FixedSettings),
            ),
        }
    }

    fn eur_buy(symbol: &str, isin: &str, units: Decimal, buy_price: Decimal) -> NewTrade {
        NewTrade {
            kind: AssetKind::Security,
            symbol: symbol.to_string(),
            isin: Some(isin.to_string()),
            name: symbol.to_string(),
            units,
            buy_price,
            currency: "EUR".to_string(),
            buy_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn position_reports_unrealized_pl() {
        let f = fixture(&[("SAP", dec!(120), "EUR")]);
        f.trade_service
            .create_trade("u1", eur_buy("SAP", "DE0007164600", dec!(10), dec!(100)))
            .await
            .unwrap();

        let positions = f.portfolio_service.get_positions("u1").await.unwrap();
        assert_eq!(positions.len(), 1);
        let p = &positions[0];
        assert_eq!(p.invested, Some(dec!(1000)));
        assert_eq!(p.current_value, Some(dec!(1200)));
        assert_eq!(p.pl_abs, Some(dec!(200)));
        assert_eq!(p.pl_pct, Some(dec!(20)));
        assert!(!p.quote_missing);
        assert!(!p.fx_missing);
    }

    #[tokio::test]
    async fn usd_quote_is_converted_to_base() {
        let f = fixture(&[("AAPL", dec!(200), "USD")]);
        let mut buy = eur_buy("AAPL", "US0378331005", dec!(10), dec!(100));
        buy.currency = "USD".to_string();
        f.trade_service.create_trade("u1", buy).await.unwrap();

        let positions = f.portfolio_service.get_positions("u1").await.unwrap();
        let p = &positions[0];
        // 10 * 100 USD * 0.9 invested, 10 * 200 USD * 0.9 value
        assert_eq!(p.invested, Some(dec!(900.0)));
        assert_eq!(p.current_value, Some(dec!(1800.0)));
        assert_eq!(p.pl_pct, Some(dec!(100.0)));
    }

    #[tokio::test]
    async fn missing_quote_is_flagged_and_excluded_from_totals() {
        let f = fixture(&[("SAP", dec!(120), "EUR")]);
        f.trade_service
            .create_trade("u1", eur_buy("SAP", "DE0007164600", dec!(10), dec!(100)))
            .await
            .unwrap();
        f.trade_service
            .create_trade("u1", eur_buy("ASML", "NL0010273215", dec!(2), dec!(500)))
            .await
            .unwrap();

        let positions = f.portfolio_service.get_positions("u1").await.unwrap();
        assert_eq!(positions.len(), 2);
        let asml = positions.iter().find(|p| p.symbol == "ASML").unwrap();
        assert!(asml.quote_missing);
        assert_eq!(asml.current_value, None);

        let summary = f.portfolio_service.get_summary("u1").await.unwrap();
        assert_eq!(summary.positions, 2);
        assert_eq!(summary.quotes_missing, 1);
        // Totals only cover SAP.
        assert_eq!(summary.total_invested, dec!(1000));
        assert_eq!(summary.total_value, dec!(1200));
        assert_eq!(summary.total_pl_abs, dec!(200));
    }

    #[tokio::test]
    async fn partial_sale_shrinks_position_and_keeps_realized_pl() {
        let f = fixture(&[("SAP", dec!(120), "EUR")]);
        let trade = f
            .trade_service
            .create_trade("u1", eur_buy("SAP", "DE0007164600", dec!(10), dec!(100)))
            .await
            .unwrap();
        f.trade_service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(4),
                    sell_price: dec!(110),
                },
            )
            .await
            .unwrap();

        let positions = f.portfolio_service.get_positions("u1").await.unwrap();
        let p = &positions[0];
        assert_eq!(p.units, dec!(6));
        assert_eq!(p.invested, Some(dec!(600)));
        assert_eq!(p.current_value, Some(dec!(720)));
        assert_eq!(p.realized_pl, Some(dec!(40)));

        let summary = f.portfolio_service.get_summary("u1").await.unwrap();
        assert_eq!(summary.total_realized_pl, dec!(40));
    }

    #[tokio::test]
    async fn closed_trade_is_not_listed_but_counts_realized_pl() {
        let f = fixture(&[("SAP", dec!(120), "EUR")]);
        let trade = f
            .trade_service
            .create_trade("u1", eur_buy("SAP", "DE0007164600", dec!(10), dec!(100)))
            .await
            .unwrap();
        f.trade_service
            .sell_units(
                "u1",
                &trade.id,
                SellRequest {
                    units: dec!(10),
                    sell_price: dec!(150),
                },
            )
            .await
            .unwrap();

        let positions = f.portfolio_service.get_positions("u1").await.unwrap();
        assert!(positions.is_empty());

        let summary = f.portfolio_service.get_summary("u1").await.unwrap();
        assert_eq!(summary.positions, 0);
        assert_eq!(summary.total_realized_pl, dec!(500));
        assert_eq!(summary.total_value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn fx_outage_degrades_position_instead_of_failing() {
        // GBP has no route to EUR in FlatFx, so the VOD position cannot
        // be valued in the base currency.
        let f = fixture(&[("SAP", dec!(120), "EUR"), ("VOD", dec!(110), "GBP")]);
        f.trade_service
            .create_trade("u1", eur_buy("SAP", "DE0007164600", dec!(10), dec!(100)))
            .await
            .unwrap();
        let mut buy = eur_buy("VOD", "GB00BH4HKS39", dec!(5), dec!(90));
        buy.currency = "GBP".to_string();
        f.trade_service.create_trade("u1", buy).await.unwrap();

        let positions = f.portfolio_service.get_positions("u1").await.unwrap();
        assert_eq!(positions.len(), 2);
        let vod = positions.iter().find(|p| p.symbol == "VOD").unwrap();
        assert!(vod.fx_missing);
        assert!(!vod.quote_missing);
        assert_eq!(vod.invested, None);
        assert_eq!(vod.current_value, None);

        let summary = f.portfolio_service.get_summary("u1").await.unwrap();
        assert_eq!(summary.positions, 2);
        assert_eq!(summary.fx_missing, 1);
        assert_eq!(summary.quotes_missing, 0);
        // Totals only cover SAP.
        assert_eq!(summary.total_invested, dec!(1000));
        assert_eq!(summary.total_value, dec!(1200));
    }

    #[tokio::test]
    async fn empty_portfolio_has_zero_percent() {
        let f = fixture(&[]);
        let summary = f.portfolio_service.get_summary("u1").await.unwrap();
        assert_eq!(summary.total_pl_pct, Decimal::ZERO);
        assert_eq!(summary.positions, 0);
    }
}
