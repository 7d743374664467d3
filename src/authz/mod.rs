/*!
 * Request-scoped authorization verification
 *
 * Responsibility:
 * - request ごとに「付与された権限 (grant)」を context に一度だけ記録する
 * - sensitive な処理の手前で「この経路で check が実行されたか」を require で検証する
 * - report-only モード (移行期間用) と diagnostic sink の管理
 *
 * これは policy engine ではない。誰にどの権限を与えるかは resolver (services::auth) の責務で、
 * ここは「check を実行したか」だけを見る。
 *
 * Public API:
 * - RequestCtx
 * - grant / check / require
 * - set_report_only / set_diagnostic_sink / mode
 * - AuthzError, Caller
 */

mod caller;
mod ctx;
mod error;
mod mode;
mod protocol;

pub use caller::Caller;
pub use ctx::RequestCtx;
pub use error::AuthzError;
pub use mode::{DiagnosticSink, Mode, mode, report, set_diagnostic_sink, set_report_only};
pub use protocol::{check, checked_privileges, grant, granted_privileges, require};

#[cfg(test)]
pub(crate) use mode::testing;
