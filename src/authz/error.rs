use thiserror::Error;

use super::caller::Caller;

/// Protocol violations returned by `check` / `require` in enforcing mode.
///
/// These are meant for the request handler (abort the sensitive operation and
/// answer with an authorization failure). The details are diagnostics only and
/// must not be echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("check failed: no privileges granted")]
    NoPrivilegesGranted,

    #[error("check failed: privilege {privilege:?} requested but not granted")]
    NotGranted { privilege: String },

    #[error("require failed: an authorization check was required and was not executed (caller={caller})")]
    CheckNotExecuted { caller: Caller },

    #[error(
        "require failed: an authorization check for privilege {privilege:?} was required and was not executed (caller={caller})"
    )]
    PrivilegeNotChecked { privilege: String, caller: Caller },
}

impl AuthzError {
    /// Offending privilege, if the violation is about a specific one.
    pub fn privilege(&self) -> Option<&str> {
        match self {
            Self::NotGranted { privilege } | Self::PrivilegeNotChecked { privilege, .. } => {
                Some(privilege)
            }
            Self::NoPrivilegesGranted | Self::CheckNotExecuted { .. } => None,
        }
    }

    /// Call site of the failing `require`.
    pub fn caller(&self) -> Option<Caller> {
        match self {
            Self::CheckNotExecuted { caller } | Self::PrivilegeNotChecked { caller, .. } => {
                Some(*caller)
            }
            Self::NoPrivilegesGranted | Self::NotGranted { .. } => None,
        }
    }
}
