//! Session extractors built on the `X-Token` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use files_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-token";

/// The raw `X-Token` header, if present and valid UTF-8.
#[derive(Debug, Clone)]
pub struct SessionToken(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(Self(token))
    }
}

/// A request with a live session. Rejects with 401 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        let user_id = state.sessions.resolve_session(token.as_deref()).await?;
        Ok(Self(user_id))
    }
}

/// A request that may be anonymous. A token that is present but does not
/// resolve still rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<UserId>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(TOKEN_HEADER) {
            return Ok(Self(None));
        }
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        Ok(Self(Some(user_id)))
    }
}
