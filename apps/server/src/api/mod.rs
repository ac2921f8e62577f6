//! API router assembly.

pub mod health;
pub mod indexes;
pub mod portfolio;
pub mod quotes;
pub mod sankey;
pub mod trades;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::main_lib::AppState;
use crate::{auth, csrf, rate_limit};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    // Everything except auth/* and health sits behind the session guard.
    let protected = Router::new()
        .merge(trades::router())
        .merge(portfolio::router())
        .merge(quotes::router())
        .merge(indexes::router())
        .merge(sankey::router())
        .merge(auth::me_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let api = Router::new()
        .merge(protected)
        .merge(auth::router())
        .merge(health::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            csrf::require_matching_origin,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));

    let cors = match config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => CorsLayer::new(),
    };

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(state)
}
