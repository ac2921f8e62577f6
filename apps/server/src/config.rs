//! Server configuration from environment variables (FT_ prefix).

/// OIDC provider settings. Login is unavailable until all four are set.
#[derive(Clone, Debug)]
pub struct OidcConfig {
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    /// Base64-encoded key for signing session and state cookies.
    pub secret_key: String,
    /// The origin mutating requests must present (CSRF check).
    pub allowed_origin: String,
    pub oidc: Option<OidcConfig>,
    pub finnhub_api_key: Option<String>,
    /// Fixed-window rate limit: requests per window per client.
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr =
            std::env::var("FT_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let db_path =
            std::env::var("FT_DB_PATH").unwrap_or_else(|_| "foliotrack.db".to_string());
        let secret_key = std::env::var("FT_SECRET_KEY").unwrap_or_default();
        let allowed_origin = std::env::var("FT_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let oidc = match (
            std::env::var("FT_OIDC_ISSUER"),
            std::env::var("FT_OIDC_CLIENT_ID"),
            std::env::var("FT_OIDC_CLIENT_SECRET"),
            std::env::var("FT_OIDC_REDIRECT_URL"),
        ) {
            (Ok(issuer), Ok(client_id), Ok(client_secret), Ok(redirect_url)) => Some(OidcConfig {
                issuer,
                client_id,
                client_secret,
                redirect_url,
            }),
            _ => None,
        };

        let rate_limit_max_requests = std::env::var("FT_RATE_LIMIT_MAX_REQUESTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);
        let rate_limit_window_secs = std::env::var("FT_RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Config {
            listen_addr,
            db_path,
            secret_key,
            allowed_origin,
            oidc,
            finnhub_api_key: std::env::var("FT_FINNHUB_API_KEY").ok(),
            rate_limit_max_requests,
            rate_limit_window_secs,
        }
    }
}
