use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::authz::RequestCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Handler で RequestCtx を受け取るための extractor
/// grant middleware が RequestCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は配線ミスなので 500 を返す (anonymous でも RequestCtx 自体は入っている)
#[derive(Debug, Clone)]
pub struct AuthzCtx(pub RequestCtx);

impl FromRequestParts<AppState> for AuthzCtx
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestCtx>()
            .cloned()
            .map(AuthzCtx)
            .ok_or_else(|| {
                tracing::error!("RequestCtx missing: grant middleware is not applied");
                AppError::Internal
            })
    }
}
