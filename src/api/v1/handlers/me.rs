/*
 * Responsibility
 * - GET /me/privileges: この request に grant された権限を返す (debug/疎通用)
 */
use axum::Json;

use crate::{
    api::v1::{dto::me::PrivilegesResponse, extractors::AuthzCtx},
    authz,
    error::AppError,
};

pub async fn privileges(AuthzCtx(ctx): AuthzCtx) -> Result<Json<PrivilegesResponse>, AppError> {
    let ctx = authz::check::<&str>(&ctx, &[])?;

    Ok(Json(PrivilegesResponse {
        granted: authz::granted_privileges(&ctx).map(<[String]>::to_vec),
    }))
}
