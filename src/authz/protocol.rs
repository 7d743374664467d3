//! Grant / check / require.
//!
//! Lineage state machine: `Unannotated -> Granted -> Checked{set}`.
//! Every transition returns a new `RequestCtx`; `require` only reads.

use std::sync::Arc;

use super::caller::Caller;
use super::ctx::RequestCtx;
use super::error::AuthzError;
use super::mode;

// Private key types: nothing outside this module can attach or forge them.
struct GrantedPrivileges(Arc<[String]>);

struct CheckedPrivileges(Arc<[String]>);

/// Attaches the privileges granted to this request.
///
/// Call exactly once, at the trust boundary that resolved the caller's
/// identity. Order and duplicates are preserved; an empty list still counts as
/// a grant ("nothing granted").
///
/// # Panics
///
/// If the lineage already carries a grant, in every mode.
#[must_use]
pub fn grant<I>(ctx: &RequestCtx, privileges: I) -> RequestCtx
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    if ctx.value::<GrantedPrivileges>().is_some() {
        panic!("authz::grant called multiple times");
    }
    let granted: Arc<[String]> = privileges.into_iter().map(Into::<String>::into).collect();
    ctx.with_value(GrantedPrivileges(granted))
}

/// Verifies that every privilege in `required` was granted and returns a child
/// context carrying proof of the check.
///
/// An empty `required` always succeeds: it declares that the guarded path
/// needs no authorization, which is not the same as "no check happened".
///
/// In report-only mode violations are reported to the diagnostic sink and the
/// child context records the full requested set anyway.
pub fn check<S>(ctx: &RequestCtx, required: &[S]) -> Result<RequestCtx, AuthzError>
where
    S: AsRef<str>,
{
    if required.is_empty() {
        return Ok(checked(ctx, required));
    }

    let report_only = mode::mode().is_report_only();

    let Some(GrantedPrivileges(granted)) = ctx.value::<GrantedPrivileges>() else {
        let err = AuthzError::NoPrivilegesGranted;
        if report_only {
            mode::report(&err);
            return Ok(checked(ctx, required));
        }
        return Err(err);
    };

    for p in required {
        let p = p.as_ref();
        if !granted.iter().any(|g| g == p) {
            let err = AuthzError::NotGranted {
                privilege: p.to_string(),
            };
            if report_only {
                mode::report(&err);
                continue;
            }
            return Err(err);
        }
    }

    Ok(checked(ctx, required))
}

fn checked<S: AsRef<str>>(ctx: &RequestCtx, privileges: &[S]) -> RequestCtx {
    let set: Arc<[String]> = privileges.iter().map(|p| p.as_ref().to_string()).collect();
    ctx.with_value(CheckedPrivileges(set))
}

/// Fails unless a `check` on this lineage covered every privilege in
/// `privileges`. Call immediately before the sensitive operation.
///
/// This looks at what was *checked*, not what was granted: a privilege that was
/// granted but never checked on this path does not pass.
#[track_caller]
pub fn require<S>(ctx: &RequestCtx, privileges: &[S]) -> Result<(), AuthzError>
where
    S: AsRef<str>,
{
    let caller = Caller::here();
    let report_only = mode::mode().is_report_only();

    let Some(CheckedPrivileges(checked)) = ctx.value::<CheckedPrivileges>() else {
        let err = AuthzError::CheckNotExecuted { caller };
        if report_only {
            mode::report(&err);
            return Ok(());
        }
        return Err(err);
    };

    for p in privileges {
        let p = p.as_ref();
        if !checked.iter().any(|c| c == p) {
            let err = AuthzError::PrivilegeNotChecked {
                privilege: p.to_string(),
                caller,
            };
            if report_only {
                mode::report(&err);
                continue;
            }
            return Err(err);
        }
    }

    Ok(())
}

/// Privileges granted on this lineage, if `grant` ran.
pub fn granted_privileges(ctx: &RequestCtx) -> Option<&[String]> {
    ctx.value::<GrantedPrivileges>().map(|g| &*g.0)
}

/// Privileges recorded by the nearest `check` on this lineage.
pub fn checked_privileges(ctx: &RequestCtx) -> Option<&[String]> {
    ctx.value::<CheckedPrivileges>().map(|c| &*c.0)
}
