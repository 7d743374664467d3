/*
 * Responsibility
 * - /posts 系 handler
 * - handler で authz::check → 得た子 context を service に渡す
 * - service 側が repo を触る直前に authz::require する
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::posts::{CreatePostRequest, PostResponse},
        extractors::AuthzCtx,
    },
    authz,
    error::AppError,
    services::posts,
    state::AppState,
};

pub async fn list_posts(
    State(state): State<AppState>,
    AuthzCtx(ctx): AuthzCtx,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let ctx = authz::check(&ctx, &[posts::READ])?;

    let rows = state.posts.list(&ctx).await?;

    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthzCtx(ctx): AuthzCtx,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let ctx = authz::check(&ctx, &[posts::WRITE])?;

    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let row = state.posts.create(&ctx, &req.title, &req.content).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_post(
    State(state): State<AppState>,
    AuthzCtx(ctx): AuthzCtx,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let ctx = authz::check(&ctx, &[posts::READ])?;

    let row = state.posts.get(&ctx, post_id).await?;

    Ok(Json(row.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthzCtx(ctx): AuthzCtx,
    Path(post_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let ctx = authz::check(&ctx, &[posts::DELETE])?;

    state.posts.delete(&ctx, post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
