/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - grant middleware は app.rs 側で v1 全体に掛ける
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::privileges,
    posts::{create_post, delete_post, get_post, list_posts},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me/privileges", get(privileges))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{post_id}", get(get_post).delete(delete_post))
}
