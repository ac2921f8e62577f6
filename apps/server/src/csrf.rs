//! CSRF guard: mutating requests must come from the configured origin.
//!
//! Session cookies are SameSite=Lax, so this check covers the
//! cross-site POST/PUT/DELETE cases the cookie attribute alone does
//! not.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::ORIGIN, Method, Request},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::main_lib::AppState;

pub async fn require_matching_origin(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let mutating = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    );
    if mutating {
        let origin = request
            .headers()
            .get(ORIGIN)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Forbidden("Missing Origin header".to_string()))?;
        if origin != state.allowed_origin {
            return Err(ApiError::Forbidden(format!(
                "Origin '{}' is not allowed",
                origin
            )));
        }
    }
    Ok(next.run(request).await)
}
