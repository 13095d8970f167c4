//! File handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use files_core::error::AppError;
use files_core::types::PageRequest;
use files_entity::file::parent;

use crate::dto::request::{DataQuery, ListFilesQuery, UploadFileRequest};
use crate::dto::response::FileResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, JsonBody, MaybeAuthUser, parse_file_id};
use crate::state::AppState;

/// POST /files
pub async fn upload(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(req): JsonBody<UploadFileRequest>,
) -> ApiResult<(StatusCode, Json<FileResponse>)> {
    let file = state.files.upload(user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(file.into())))
}

/// GET /files/{id}
pub async fn show(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<FileResponse>> {
    let id = parse_file_id(&id)?;
    Ok(Json(state.files.show(user_id, id).await?.into()))
}

/// GET /files?parentId=...&page=...
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> ApiResult<Json<Vec<FileResponse>>> {
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.parse().ok())
        .map(PageRequest::new)
        .unwrap_or_default();

    // An unparsable parent cannot contain anything.
    let Some(parent_id) = parent::parse(query.parent_id.as_deref().unwrap_or("0")) else {
        return Ok(Json(Vec::new()));
    };

    let files = state.files.index(user_id, parent_id, page).await?;
    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// PUT /files/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<FileResponse>> {
    let id = parse_file_id(&id)?;
    Ok(Json(state.files.publish(user_id, id).await?.into()))
}

/// PUT /files/{id}/unpublish
pub async fn unpublish(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<FileResponse>> {
    let id = parse_file_id(&id)?;
    Ok(Json(state.files.unpublish(user_id, id).await?.into()))
}

/// GET|POST /files/{id}/data?size=...
pub async fn data(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<String>,
    Query(query): Query<DataQuery>,
) -> ApiResult<Response> {
    let id = parse_file_id(&id)?;
    let size = match query.size.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| AppError::not_found("Not found"))?,
        ),
    };

    let content = state.files.data(viewer, id, size).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content.content_type)
        .body(Body::from_stream(content.body))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;
    Ok(response)
}
