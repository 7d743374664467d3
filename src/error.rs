/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - authz / service error を統一的に変換 (内部の理由は client に返さない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::authz::{self, AuthzError};
use crate::services::auth::ResolveError;
use crate::services::posts::PostError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{resource} not found."),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden".into()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthzError> for AppError {
    fn from(e: AuthzError) -> Self {
        // 詳細は diagnostic sink にだけ流す
        authz::report(&e);
        AppError::Forbidden
    }
}

impl From<PostError> for AppError {
    fn from(e: PostError) -> Self {
        match e {
            PostError::Authz(e) => e.into(),
            PostError::NotFound => AppError::not_found("post"),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        tracing::warn!(error = ?e, "privilege resolution failed");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serial_test::serial;

    use super::*;
    use crate::authz::testing::Diagnostics;

    #[tokio::test]
    #[serial]
    async fn authz_errors_become_opaque_forbidden() {
        let diag = Diagnostics::enforcing();

        let err: AppError = AuthzError::NotGranted {
            privilege: "posts:delete".into(),
        }
        .into();
        let res = err.into_response();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["message"], "forbidden");
        assert!(!String::from_utf8_lossy(&bytes).contains("posts:delete"));

        assert_eq!(
            diag.lines(),
            vec![
                "authz: enforce: check failed: privilege \"posts:delete\" requested but not granted"
                    .to_string()
            ]
        );
    }

    #[test]
    fn post_not_found_maps_to_404() {
        let res = AppError::from(PostError::NotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
