/*
 * Responsibility
 * - 依存生成 → Router 組み立て
 * - Middleware の適用 (grant / HTTP 横断)
 * - axum::serve() で起動
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::Config,
    middleware,
    repos::post_repo::PostRepo,
    services::{auth::StaticTokenResolver, posts::PostService},
    state::AppState,
};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // test などで二重に初期化されても落とさない
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config);
    let app = build_router(state, &config);

    tracing::info!(
        addr = %config.addr,
        app_env = ?config.app_env,
        authz_mode = ?crate::authz::mode(),
        "listening"
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> AppState {
    let resolver = StaticTokenResolver::new(config.authz_tokens.clone());
    AppState::new(PostService::new(PostRepo::new()), Arc::new(resolver))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::grant::apply(api::v1::routes(), state.clone());

    let app = Router::new().nest("/api/v1", v1).with_state(state);

    middleware::http::apply(app, config)
}
