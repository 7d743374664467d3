/*
 * Responsibility
 * - 認証済み主体 (bearer token) に付与する権限の解決
 * - 解決結果を authz::grant に渡すのは middleware 側
 */
pub mod resolver;

pub use resolver::{PrivilegeResolver, ResolveError, StaticTokenResolver};
