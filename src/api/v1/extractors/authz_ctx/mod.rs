/*!
 * Authorization context extractor
 *
 * Responsibility:
 * - middleware::auth::grant が request extensions に入れた RequestCtx を handler に渡す
 * - handler はこれを起点に authz::check し、得た子 context を service に渡す
 */

mod core;

pub use core::AuthzCtx;
