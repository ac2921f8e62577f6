//! Application state construction and tracing setup.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::auth::{decode_secret_key, OidcClient, SessionManager};
use crate::config::Config;
use crate::rate_limit::FixedWindowLimiter;
use foliotrack_core::{
    fx::{FxService, FxServiceTrait},
    portfolio::{PortfolioService, PortfolioServiceTrait},
    quotes::{QuoteService, QuoteServiceTrait},
    sankey::{SankeyService, SankeyServiceTrait},
    settings::{SettingsService, SettingsServiceTrait},
    trades::{TradeService, TradeServiceTrait},
    users::{UserService, UserServiceTrait},
};
use foliotrack_market_data::{
    CoinGeckoProvider, ExchangeRateApiProvider, FinnhubProvider, FrankfurterProvider,
    ProviderRegistry, QuoteProvider,
};
use foliotrack_storage_sqlite::{
    db, sankey::SankeyRepository, settings::SettingsRepository, trades::TradeRepository,
    users::UserRepository,
};

pub struct AppState {
    pub trade_service: Arc<dyn TradeServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub sankey_service: Arc<dyn SankeyServiceTrait>,
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub pool: Arc<db::DbPool>,
    pub sessions: SessionManager,
    pub oidc: Option<OidcClient>,
    pub allowed_origin: String,
    pub rate_limiter: FixedWindowLimiter,
}

pub fn init_tracing() {
    let log_format = std::env::var("FT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let writer = db::spawn_writer(pool.clone());

    let trade_repository = Arc::new(TradeRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let sankey_repository = Arc::new(SankeyRepository::new(pool.clone(), writer.clone()));
    let settings_repository = Arc::new(SettingsRepository::new(pool.clone(), writer.clone()));

    let settings_service: Arc<dyn SettingsServiceTrait> =
        Arc::new(SettingsService::new(settings_repository));
    let base_currency = settings_service.base_currency()?;

    let mut providers: Vec<Arc<dyn QuoteProvider>> = Vec::new();
    match &config.finnhub_api_key {
        Some(api_key) => providers.push(Arc::new(FinnhubProvider::new(api_key.clone()))),
        None => tracing::warn!(
            "FT_FINNHUB_API_KEY is not set; security and index quotes are unavailable"
        ),
    }
    providers.push(Arc::new(CoinGeckoProvider::new(&base_currency)));
    providers.push(Arc::new(FrankfurterProvider::new()));
    providers.push(Arc::new(ExchangeRateApiProvider::new()));
    let registry = Arc::new(ProviderRegistry::new(providers));

    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(registry));
    let fx_service: Arc<dyn FxServiceTrait> = Arc::new(FxService::new(quote_service.clone()));
    let trade_service: Arc<dyn TradeServiceTrait> =
        Arc::new(TradeService::new(trade_repository.clone()));
    let portfolio_service: Arc<dyn PortfolioServiceTrait> = Arc::new(PortfolioService::new(
        trade_repository,
        quote_service.clone(),
        fx_service.clone(),
        settings_service.clone(),
    ));
    let sankey_service: Arc<dyn SankeyServiceTrait> =
        Arc::new(SankeyService::new(sankey_repository));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(user_repository));

    let secret = decode_secret_key(&config.secret_key)?;
    let sessions = SessionManager::new(&secret);
    let oidc = config.oidc.clone().map(OidcClient::new);
    let rate_limiter = FixedWindowLimiter::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );

    Ok(Arc::new(AppState {
        trade_service,
        portfolio_service,
        quote_service,
        fx_service,
        sankey_service,
        settings_service,
        user_service,
        pool,
        sessions,
        oidc,
        allowed_origin: config.allowed_origin.clone(),
        rate_limiter,
    }))
}
