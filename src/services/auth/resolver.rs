//! Identity → privilege resolution (the trust boundary that feeds `authz::grant`).
use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TokenTable;

/// Resolver-layer errors.
///
/// Note:
/// - "unknown token" is not an error (`Ok(None)`); this is for backend failures
///   only, and callers must fail closed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("privilege backend error: {0}")]
    Backend(String),
}

/// Decides which privileges a bearer token carries.
///
/// Implementations must be cheap to share (`Arc<dyn PrivilegeResolver>`).
#[async_trait]
pub trait PrivilegeResolver: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Returns:
    // - `Ok(Some(privileges))` for a known token
    // - `Ok(None)` for an unknown token
    // - `Err(_)` on backend failure
    async fn resolve(&self, token: &str) -> Result<Option<Vec<String>>, ResolveError>;
}

/// Fixed token table loaded from `AUTHZ_TOKENS`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, Vec<String>>,
}

impl StaticTokenResolver {
    pub fn new(tokens: TokenTable) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl PrivilegeResolver for StaticTokenResolver {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self, token: &str) -> Result<Option<Vec<String>>, ResolveError> {
        Ok(self.tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_token_table;

    #[tokio::test]
    async fn static_resolver_looks_up_tokens() {
        let resolver =
            StaticTokenResolver::new(parse_token_table("alice=posts:read,posts:write").unwrap());

        assert_eq!(
            resolver.resolve("alice").await.unwrap(),
            Some(vec!["posts:read".to_string(), "posts:write".to_string()])
        );
        assert_eq!(resolver.resolve("mallory").await.unwrap(), None);
        assert_eq!(resolver.backend_name(), "static");
    }
}
