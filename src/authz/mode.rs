//! Process-wide mode controller.
//!
//! Responsibility:
//! - Enforcing (default) / ReportOnly の切り替え
//! - 違反メッセージを受け取る diagnostic sink の差し替え
//!
//! Both are meant to be written once at startup, before the server starts
//! accepting requests. The storage is still synchronised (atomic flag + RwLock)
//! so a late write is merely racy in effect, never unsound.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::caller::Caller;
use super::error::AuthzError;

/// Receives one human-readable message per violation. Called synchronously on
/// the request path, so it must not block.
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Enforcing,
    ReportOnly,
}

impl Mode {
    pub fn log_prefix(self) -> &'static str {
        match self {
            Mode::Enforcing => "authz: enforce: ",
            Mode::ReportOnly => "authz: report only: ",
        }
    }

    pub fn is_report_only(self) -> bool {
        matches!(self, Mode::ReportOnly)
    }
}

static REPORT_ONLY: AtomicBool = AtomicBool::new(false);

static SINK: LazyLock<RwLock<DiagnosticSink>> = LazyLock::new(|| RwLock::new(default_sink()));

fn default_sink() -> DiagnosticSink {
    Arc::new(|msg: &str| tracing::warn!(target: "authz", "{msg}"))
}

/// Current process mode.
pub fn mode() -> Mode {
    if REPORT_ONLY.load(Ordering::Acquire) {
        Mode::ReportOnly
    } else {
        Mode::Enforcing
    }
}

/// Switches the whole process to report-only and installs `sink`.
///
/// In report-only mode `check`/`require` never fail: violations are sent to the
/// sink and the call proceeds as if it had succeeded. This only exists to roll
/// the protocol out on an existing application without breaking traffic.
///
/// # Panics
///
/// Unless called directly from a binary crate root (`src/main.rs`,
/// `src/bin/<name>.rs`, `src/bin/<name>/main.rs`). Misuse of the protocol
/// (double grant, this gate) stays fatal in every mode.
#[track_caller]
pub fn set_report_only<F>(sink: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let caller = Caller::here();
    if !caller.is_entry_point() {
        panic!("authz can only be set to report-only from a binary crate root (caller={caller})");
    }
    enable_report_only(Arc::new(sink));
}

fn enable_report_only(sink: DiagnosticSink) {
    install_sink(sink);
    REPORT_ONLY.store(true, Ordering::Release);
    report_raw("authorization is NOT enforced, violations are only logged");
}

/// Replaces the diagnostic sink. No caller restriction.
pub fn set_diagnostic_sink<F>(sink: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    install_sink(Arc::new(sink));
}

fn install_sink(sink: DiagnosticSink) {
    let mut slot = SINK.write().unwrap_or_else(PoisonError::into_inner);
    *slot = sink;
}

/// Sends a violation to the diagnostic sink, prefixed with the current mode.
pub fn report(err: &AuthzError) {
    report_raw(&err.to_string());
}

fn report_raw(msg: &str) {
    // lock を握ったまま sink を呼ばない (sink 内からの差し替えで deadlock しないように)
    let sink = SINK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    sink(&format!("{}{}", mode().log_prefix(), msg));
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Captures every diagnostic while alive; restores enforcing mode and the
    /// default sink on drop. Tests using it must be `#[serial]`.
    pub(crate) struct Diagnostics {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Diagnostics {
        pub(crate) fn enforcing() -> Self {
            let this = Self {
                lines: Arc::default(),
            };
            REPORT_ONLY.store(false, Ordering::Release);
            install_sink(this.sink());
            this
        }

        pub(crate) fn report_only() -> Self {
            let this = Self {
                lines: Arc::default(),
            };
            enable_report_only(this.sink());
            // drop the "NOT enforced" banner
            this.lines.lock().unwrap().clear();
            this
        }

        fn sink(&self) -> DiagnosticSink {
            let lines = Arc::clone(&self.lines);
            Arc::new(move |msg: &str| lines.lock().unwrap().push(msg.to_string()))
        }

        pub(crate) fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Drop for Diagnostics {
        fn drop(&mut self) {
            REPORT_ONLY.store(false, Ordering::Release);
            install_sink(default_sink());
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::testing::Diagnostics;
    use super::*;

    #[test]
    #[serial]
    fn defaults_to_enforcing() {
        let _diag = Diagnostics::enforcing();
        assert_eq!(mode(), Mode::Enforcing);
        assert!(!mode().is_report_only());
    }

    #[test]
    #[serial]
    fn report_only_gate_rejects_non_entry_point() {
        let _diag = Diagnostics::enforcing();

        let result = std::panic::catch_unwind(|| set_report_only(|_| {}));

        assert!(result.is_err());
        assert_eq!(mode(), Mode::Enforcing);
    }

    #[test]
    #[serial]
    fn report_only_switches_mode_and_prefix() {
        let diag = Diagnostics::report_only();
        assert_eq!(mode(), Mode::ReportOnly);

        report(&AuthzError::NoPrivilegesGranted);

        assert_eq!(
            diag.lines(),
            vec!["authz: report only: check failed: no privileges granted".to_string()]
        );
    }

    #[test]
    #[serial]
    fn diagnostic_sink_can_be_replaced_in_enforcing_mode() {
        let diag = Diagnostics::enforcing();

        report(&AuthzError::NotGranted {
            privilege: "posts:write".into(),
        });

        assert_eq!(
            diag.lines(),
            vec![
                "authz: enforce: check failed: privilege \"posts:write\" requested but not granted"
                    .to_string()
            ]
        );
    }

    #[test]
    #[serial]
    fn set_diagnostic_sink_does_not_change_mode() {
        let _diag = Diagnostics::enforcing();
        set_diagnostic_sink(|_| {});
        assert_eq!(mode(), Mode::Enforcing);
    }
}
