/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::grant (per-request の権限付与), http (横断的な HTTP 関心事)
 */
pub mod auth;
pub mod http;
