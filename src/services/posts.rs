/*
 * Responsibility
 * - posts のユースケース
 * - repo を触る直前に authz::require する (handler 側で check 済みであること)
 */
use thiserror::Error;
use uuid::Uuid;

use crate::authz::{self, AuthzError, RequestCtx};
use crate::repos::post_repo::{PostRepo, PostRow};

pub const READ: &str = "posts:read";
pub const WRITE: &str = "posts:write";
pub const DELETE: &str = "posts:delete";

const PAGE_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Authz(#[from] AuthzError),
    #[error("post not found")]
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct PostService {
    repo: PostRepo,
}

impl PostService {
    pub fn new(repo: PostRepo) -> Self {
        Self { repo }
    }

    pub async fn list(&self, ctx: &RequestCtx) -> Result<Vec<PostRow>, PostError> {
        authz::require(ctx, &[READ])?;
        Ok(self.repo.list(PAGE_SIZE, 0).await)
    }

    pub async fn get(&self, ctx: &RequestCtx, post_id: Uuid) -> Result<PostRow, PostError> {
        authz::require(ctx, &[READ])?;
        self.repo.get(post_id).await.ok_or(PostError::NotFound)
    }

    pub async fn create(
        &self,
        ctx: &RequestCtx,
        title: &str,
        content: &str,
    ) -> Result<PostRow, PostError> {
        authz::require(ctx, &[WRITE])?;
        Ok(self.repo.create(title, content).await)
    }

    pub async fn delete(&self, ctx: &RequestCtx, post_id: Uuid) -> Result<(), PostError> {
        authz::require(ctx, &[DELETE])?;
        if self.repo.delete(post_id).await {
            Ok(())
        } else {
            Err(PostError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::authz::testing::Diagnostics;

    fn granted_all() -> RequestCtx {
        authz::grant(&RequestCtx::background(), [READ, WRITE, DELETE])
    }

    #[tokio::test]
    #[serial]
    async fn rejects_unchecked_context_even_if_granted() {
        let _diag = Diagnostics::enforcing();
        let svc = PostService::default();

        let err = svc.create(&granted_all(), "t", "c").await.unwrap_err();

        assert!(matches!(
            err,
            PostError::Authz(AuthzError::CheckNotExecuted { .. })
        ));
        assert!(svc.repo.list(PAGE_SIZE, 0).await.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn checked_write_does_not_allow_delete() {
        let _diag = Diagnostics::enforcing();
        let svc = PostService::default();
        let ctx = authz::check(&granted_all(), &[WRITE]).unwrap();

        let row = svc.create(&ctx, "t", "c").await.unwrap();
        let err = svc.delete(&ctx, row.post_id).await.unwrap_err();

        match err {
            PostError::Authz(e) => assert_eq!(e.privilege(), Some(DELETE)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(svc.repo.get(row.post_id).await.is_some());
    }

    #[tokio::test]
    #[serial]
    async fn full_flow_with_checks() {
        let _diag = Diagnostics::enforcing();
        let svc = PostService::default();
        let ctx = granted_all();

        let write = authz::check(&ctx, &[WRITE]).unwrap();
        let row = svc.create(&write, "t", "c").await.unwrap();

        let read = authz::check(&ctx, &[READ]).unwrap();
        assert_eq!(svc.get(&read, row.post_id).await.unwrap().title, "t");
        assert_eq!(svc.list(&read).await.unwrap().len(), 1);

        let delete = authz::check(&ctx, &[DELETE]).unwrap();
        svc.delete(&delete, row.post_id).await.unwrap();
        assert!(matches!(
            svc.delete(&delete, row.post_id).await,
            Err(PostError::NotFound)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn report_only_lets_unchecked_calls_through() {
        let diag = Diagnostics::report_only();
        let svc = PostService::default();

        let row = svc
            .create(&RequestCtx::background(), "t", "c")
            .await
            .unwrap();

        assert_eq!(row.title, "t");
        assert_eq!(diag.lines().len(), 1);
        assert!(diag.lines()[0].contains("services/posts.rs"));
    }
}
