//! OIDC sign-in, session cookies, and the session-guard middleware.

mod oidc;
mod session;

pub use oidc::{IdTokenClaims, OidcClient};
pub use session::{decode_secret_key, SessionManager, SESSION_COOKIE, STATE_COOKIE};

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, Request, StatusCode,
    },
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use foliotrack_core::users::User;

/// The authenticated user id, inserted by [`require_session`].
#[derive(Clone)]
pub struct CurrentUser(pub String);

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
        .next()
}

fn set_cookie(name: &str, value: &str, max_age_secs: u64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

fn clear_cookie(name: &str) -> String {
    set_cookie(name, "", 0)
}

/// Session guard applied to every route outside `auth/*` and `health`.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookie_value(request.headers(), SESSION_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Missing session cookie".to_string()))?;
    let user_id = state.sessions.validate_session(&token)?;
    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

async fn login(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let oidc = state.oidc.as_ref().ok_or(ApiError::NotConfigured)?;

    let login_state = Uuid::new_v4().to_string();
    let nonce = Uuid::new_v4().to_string();
    let url = oidc.authorization_url(&login_state, &nonce).await?;
    let state_token = state.sessions.issue_state(&login_state, &nonce)?;

    Ok((
        AppendHeaders([(SET_COOKIE, set_cookie(STATE_COOKIE, &state_token, 600))]),
        Redirect::temporary(&url),
    )
        .into_response())
}

#[derive(Deserialize)]
struct CallbackParams {
    code: String,
    state: String,
}

async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Response> {
    let oidc = state.oidc.as_ref().ok_or(ApiError::NotConfigured)?;

    let state_token = cookie_value(&headers, STATE_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Missing login state cookie".to_string()))?;
    let state_claims = state.sessions.validate_state(&state_token)?;
    if params.state != state_claims.state {
        return Err(ApiError::Unauthorized("Login state mismatch".to_string()));
    }

    let claims = oidc.exchange_code(&params.code).await?;
    if claims.nonce.as_deref() != Some(state_claims.nonce.as_str()) {
        return Err(ApiError::Unauthorized("Login nonce mismatch".to_string()));
    }

    let user = state
        .user_service
        .ensure_user(&claims.sub, claims.email, claims.name)
        .await?;
    let session_token = state.sessions.issue_session(&user.id)?;

    Ok((
        AppendHeaders([
            (
                SET_COOKIE,
                set_cookie(SESSION_COOKIE, &session_token, 7 * 24 * 60 * 60),
            ),
            (SET_COOKIE, clear_cookie(STATE_COOKIE)),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}

async fn me(
    State(state): State<Arc<AppState>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&current.0)?;
    Ok(Json(user))
}

async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_cookie(SESSION_COOKIE))]),
        StatusCode::NO_CONTENT,
    )
}

/// Public auth routes. `/auth/me` is registered behind the session
/// guard in the main router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/auth/logout", post(logout))
}

pub fn me_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}
