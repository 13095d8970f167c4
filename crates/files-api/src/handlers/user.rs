//! User handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use files_entity::user::UserProfile;

use crate::dto::request::RegisterRequest;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, JsonBody};
use crate::state::AppState;

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state
        .users
        .register(req.email.as_deref(), req.password.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /users/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.get_self(user_id).await?))
}
