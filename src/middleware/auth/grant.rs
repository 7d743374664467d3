//! bearer token → 権限解決 → authz::grant → RequestCtx を extensions に入れる
//!
//! - Authorization header なし: anonymous。grant しない RequestCtx を渡す
//!   (open endpoint は `authz::check(&ctx, &[])` で通る。権限が要る check は失敗する)
//! - header が壊れている / 未知の token: 401
//! - resolver backend の失敗: 500 (fail-closed)
//!
//! grant はここで一度だけ行う。handler 以降は check/require のみ。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::authz::{self, RequestCtx};
use crate::error::AppError;
use crate::state::AppState;

/// `/api/v1/*` に grant を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::grant::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, grant_middleware))
}

async fn grant_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // header は await をまたいで借用しないよう先に String にしておく
    let bearer = req.headers().get(header::AUTHORIZATION).map(|value| {
        value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    });

    let ctx = match bearer {
        None => RequestCtx::background(),
        Some(None) => return Err(AppError::Unauthorized),
        Some(Some(token)) => {
            let privileges = match state.resolver.resolve(&token).await? {
                Some(privileges) => privileges,
                None => {
                    tracing::warn!(
                        backend = state.resolver.backend_name(),
                        "unknown bearer token"
                    );
                    return Err(AppError::Unauthorized);
                }
            };

            tracing::debug!(granted = ?privileges, "privileges granted");
            authz::grant(&RequestCtx::background(), privileges)
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
