/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - posts: PostService, resolver: PrivilegeResolver
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - request ごとの権限情報はここには置かない (authz::RequestCtx が持つ)
 */
use std::fmt;
use std::sync::Arc;

use crate::services::{auth::PrivilegeResolver, posts::PostService};

#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub resolver: Arc<dyn PrivilegeResolver>,
}

impl AppState {
    pub fn new(posts: PostService, resolver: Arc<dyn PrivilegeResolver>) -> Self {
        Self { posts, resolver }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // token table は出さない
        f.debug_struct("AppState")
            .field("posts", &self.posts)
            .field("resolver", &self.resolver.backend_name())
            .finish()
    }
}
