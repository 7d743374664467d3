/*
 * Responsibility
 * - GET /health (疎通用)
 * - 権限不要の endpoint であることを空の check で明示する
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{api::v1::extractors::AuthzCtx, authz, error::AppError};

pub async fn health(AuthzCtx(ctx): AuthzCtx) -> Result<impl IntoResponse, AppError> {
    let _ctx = authz::check::<&str>(&ctx, &[])?;
    Ok((StatusCode::OK, Json(json!({"status": "ok"}))))
}
