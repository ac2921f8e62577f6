use std::borrow::Cow;

/// Provider identifier (e.g., "FINNHUB", "COINGECKO").
pub type ProviderId = Cow<'static, str>;

/// Currency code (ISO 4217), e.g., "EUR", "USD".
pub type Currency = String;
