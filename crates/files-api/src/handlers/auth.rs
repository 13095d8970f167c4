//! Session handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};

use crate::dto::response::TokenResponse;
use crate::error::ApiResult;
use crate::extractors::SessionToken;
use crate::state::AppState;

/// GET /connect
pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenResponse>> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = state.sessions.login(authorization).await?;
    Ok(Json(TokenResponse { token }))
}

/// GET /disconnect
pub async fn disconnect(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> ApiResult<StatusCode> {
    state.sessions.logout(token.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}
