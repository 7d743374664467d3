//! Request-scoped context value chain.
//!
//! `RequestCtx` は immutable な key/value の連鎖。`with_value` は親を共有した新しい子を返し、
//! 親は変更しない。key は値の型そのもの (TypeId) なので、モジュール外から見えない型を
//! key にすれば他のサブシステムから偽造・上書きされない。
//!
//! - Clone は Arc の clone のみ (cheap)
//! - Send + Sync なので tokio task 間で共有してよい
//! - lookup は末端 (最新) から親方向に辿り、最初に見つかった値を返す

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

struct Node {
    parent: Option<Arc<Node>>,
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
}

/// Immutable per-request context.
///
/// `RequestCtx::background()` is the empty root. Every derived context keeps a
/// reference to its parent, so a lineage forms a chain that follows the
/// request's control flow. Siblings derived from the same parent never see each
/// other's values.
#[derive(Clone, Default)]
pub struct RequestCtx {
    head: Option<Arc<Node>>,
}

impl RequestCtx {
    /// Empty root context (no values).
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a child context carrying `value`, keyed by its type.
    #[must_use]
    pub fn with_value<T>(&self, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                key: TypeId::of::<T>(),
                value: Arc::new(value),
            })),
        }
    }

    /// Nearest value of type `T` in this lineage.
    pub fn value<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        let key = TypeId::of::<T>();
        let mut cur = self.head.as_deref();
        while let Some(node) = cur {
            if node.key == key {
                return node.value.downcast_ref::<T>();
            }
            cur = node.parent.as_deref();
        }
        None
    }

    /// Number of values attached along the lineage.
    pub fn depth(&self) -> usize {
        let mut n = 0;
        let mut cur = self.head.as_deref();
        while let Some(node) = cur {
            n += 1;
            cur = node.parent.as_deref();
        }
        n
    }
}

impl fmt::Debug for RequestCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 値は Any なので中身は出さない
        f.debug_struct("RequestCtx")
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tenant(&'static str);

    #[derive(Debug, PartialEq)]
    struct Trace(u64);

    #[test]
    fn background_is_empty() {
        let ctx = RequestCtx::background();
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.value::<Tenant>().is_none());
    }

    #[test]
    fn nearest_value_wins_and_parent_is_untouched() {
        let root = RequestCtx::background().with_value(Tenant("a"));
        let child = root.with_value(Trace(7)).with_value(Tenant("b"));

        assert_eq!(child.value::<Tenant>(), Some(&Tenant("b")));
        assert_eq!(child.value::<Trace>(), Some(&Trace(7)));
        assert_eq!(root.value::<Tenant>(), Some(&Tenant("a")));
        assert!(root.value::<Trace>().is_none());
        assert_eq!(child.depth(), 3);
    }

    #[test]
    fn siblings_do_not_observe_each_other() {
        let parent = RequestCtx::background().with_value(Tenant("p"));
        let left = parent.with_value(Trace(1));
        let right = parent.with_value(Trace(2));

        assert_eq!(left.value::<Trace>(), Some(&Trace(1)));
        assert_eq!(right.value::<Trace>(), Some(&Trace(2)));
        assert!(parent.value::<Trace>().is_none());
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone + 'static>() {}
        assert_send_sync::<RequestCtx>();
    }
}
