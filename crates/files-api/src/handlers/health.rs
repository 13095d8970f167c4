//! Health and statistics handlers.

use axum::Json;
use axum::extract::State;

use files_service::{AppStats, AppStatus};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<AppStatus> {
    Json(state.app.status().await)
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<AppStats>> {
    Ok(Json(state.app.stats().await?))
}
