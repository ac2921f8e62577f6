//! Session and state cookies: HS256 JWTs signed with the server secret.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "ft_session";
pub const STATE_COOKIE: &str = "ft_oidc_state";

const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const STATE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: usize,
    exp: usize,
}

/// Claims round-tripped through the login redirect.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateClaims {
    pub state: String,
    pub nonce: String,
    iat: usize,
    exp: usize,
}

pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionManager {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    fn now() -> Result<Duration, ApiError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ApiError::Internal("System clock is before UNIX_EPOCH".into()))
    }

    pub fn issue_session(&self, user_id: &str) -> Result<String, ApiError> {
        let now = Self::now()?;
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.as_secs() as usize,
            exp: (now + SESSION_TTL).as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign session token: {e}")))
    }

    /// Returns the user id when the session token is valid.
    pub fn validate_session(&self, token: &str) -> Result<String, ApiError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))
    }

    pub fn issue_state(&self, state: &str, nonce: &str) -> Result<String, ApiError> {
        let now = Self::now()?;
        let claims = StateClaims {
            state: state.to_string(),
            nonce: nonce.to_string(),
            iat: now.as_secs() as usize,
            exp: (now + STATE_TTL).as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign state token: {e}")))
    }

    pub fn validate_state(&self, token: &str) -> Result<StateClaims, ApiError> {
        decode::<StateClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired login state".to_string()))
    }
}

/// Decode the configured secret: a raw 32-byte ASCII string, or base64
/// of 32 bytes. The raw form wins because many 32-char strings also
/// happen to be valid base64 of the wrong length.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("FT_SECRET_KEY cannot be empty");
    }
    if trimmed.len() == 32 && trimmed.is_ascii() {
        return Ok(trimmed.as_bytes().to_vec());
    }

    let decoded = BASE64
        .decode(trimmed)
        .map_err(|_| anyhow::anyhow!("FT_SECRET_KEY must be base64 or a 32-byte ASCII string"))?;
    if decoded.len() != 32 {
        anyhow::bail!("FT_SECRET_KEY must decode to exactly 32 bytes");
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(b"0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn session_round_trips() {
        let sessions = manager();
        let token = sessions.issue_session("u1").unwrap();
        assert_eq!(sessions.validate_session(&token).unwrap(), "u1");
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(manager().validate_session("not-a-jwt").is_err());
    }

    #[test]
    fn state_token_carries_nonce() {
        let sessions = manager();
        let token = sessions.issue_state("st", "no").unwrap();
        let claims = sessions.validate_state(&token).unwrap();
        assert_eq!(claims.state, "st");
        assert_eq!(claims.nonce, "no");
    }

    #[test]
    fn session_token_is_not_a_state_token() {
        let sessions = manager();
        let token = sessions.issue_session("u1").unwrap();
        assert!(sessions.validate_state(&token).is_err());
    }

    #[test]
    fn secret_key_accepts_base64_and_raw() {
        assert!(decode_secret_key("0123456789abcdef0123456789abcdef").is_ok());
        let b64 = BASE64.encode([7u8; 32]);
        assert_eq!(decode_secret_key(&b64).unwrap(), vec![7u8; 32]);
        assert!(decode_secret_key("short").is_err());
    }
}
