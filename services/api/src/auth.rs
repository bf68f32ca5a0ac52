//! JWT access tokens and the bearer-token identity extractor.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::TOKEN_TTL_SECS;
use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims payload. `sub` is the only identity the token carries;
/// everything else about the user is loaded fresh per request.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Issue a 7-day HS256 access token for a user.
pub fn issue_access_token(user_id: Uuid, secret: &str) -> Result<String, ApiError> {
    let claims = TokenClaims {
        sub: user_id.to_string(),
        exp: now_secs() + TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))
}

/// Decode and validate an access token, returning the user id it names.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s — tolerates small clock skew.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    data.claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)
}

/// Caller identity extracted from the `Authorization: Bearer` header.
///
/// Rejects with 401 `INVALID_TOKEN` when the header is absent or the token
/// fails validation. Ownership checks (403) are done by usecases afterwards.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|header| header.token().to_owned());
        let secret = state.jwt_secret.clone();

        async move {
            let token = token.ok_or(ApiError::InvalidToken)?;
            let user_id =
                validate_access_token(&token, &secret).map_err(|_| ApiError::InvalidToken)?;
            Ok(Self { user_id })
        }
    }
}
