//! Route definitions for the Files Manager HTTP API.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server);

    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(file_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::health::status))
        .route("/stats", get(handlers::health::stats))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/connect", get(handlers::auth::connect))
        .route("/disconnect", get(handlers::auth::disconnect))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::user::create_user))
        .route("/users/me", get(handlers::user::me))
}

fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::file::index).post(handlers::file::upload),
        )
        .route("/files/{id}", get(handlers::file::show))
        .route("/files/{id}/publish", put(handlers::file::publish))
        .route("/files/{id}/unpublish", put(handlers::file::unpublish))
        .route(
            "/files/{id}/data",
            get(handlers::file::data).post(handlers::file::data),
        )
}
