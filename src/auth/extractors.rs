use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use tracing::warn;

use super::jwt::{Claims, JwtKeys, TokenError};
use crate::{
    error::{ApiError, ErrorResponse},
    state::AppState,
};

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Verify the session token carried in `X-Auth-Token`.
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<Claims, TokenError> {
    let token = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(TokenError::Malformed)?;
    keys.verify(token)
}

/// Authenticated user ID. Every failure rejects with the same 401.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        match authenticate(&parts.headers, &keys) {
            Ok(claims) => Ok(AuthUser(claims.user_id)),
            Err(kind) => {
                warn!(?kind, "request not authenticated");
                Err(ApiError::Unauthenticated.localize(&state.config.messages))
            }
        }
    }
}
