//! Application-wide constants.

/// Default base currency for new installations.
pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

/// Setting key for the user-chosen base currency.
pub const BASE_CURRENCY_SETTING: &str = "base_currency";

/// Market indices shown in the dashboard ticker strip: (symbol, name).
/// Finnhub index symbols use the caret prefix.
pub const INDEX_TICKERS: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^NDX", "NASDAQ 100"),
    ("^GDAXI", "DAX"),
];
