//! Readiness verdict types.
//!
//! Every run of the pre-flight pipeline produces exactly one [`CheckResult`].
//! A passing result carries no text; a failing one always carries both a
//! description of what went wrong and copy-pasteable remediation steps.

use serde::Serialize;

/// Why the environment is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The environment is ready.
    None,
    /// The runtime executable is not on PATH.
    RuntimeNotInstalled,
    /// The runtime daemon is not running or not reachable.
    DaemonNotRunning,
    /// The current user cannot talk to the daemon's control socket.
    PermissionDenied,
    /// The user was added to the runtime group but the login session predates it.
    GroupMembershipNotRefreshed,
}

impl ErrorKind {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::None => "ready",
            ErrorKind::RuntimeNotInstalled => "runtime not installed",
            ErrorKind::DaemonNotRunning => "daemon not running",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::GroupMembershipNotRefreshed => "group membership not refreshed",
        }
    }
}

/// Outcome of the pre-flight pipeline.
///
/// Fields are private so that `passed`, `error_kind` and the text fields can
/// never disagree. Use [`CheckResult::ready`] or [`CheckResult::failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    passed: bool,
    error_kind: ErrorKind,
    message: String,
    suggested_action: String,
}

impl CheckResult {
    /// The environment is ready for runtime operations.
    pub fn ready() -> Self {
        Self {
            passed: true,
            error_kind: ErrorKind::None,
            message: String::new(),
            suggested_action: String::new(),
        }
    }

    /// A diagnosed failure.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `kind` is [`ErrorKind::None`] or either text
    /// is blank.
    pub fn failed(
        kind: ErrorKind,
        message: impl Into<String>,
        suggested_action: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let suggested_action = suggested_action.into();
        debug_assert!(kind != ErrorKind::None, "failed result needs an error kind");
        debug_assert!(!message.trim().is_empty(), "failed result needs a message");
        debug_assert!(
            !suggested_action.trim().is_empty(),
            "failed result needs a suggested action"
        );

        Self {
            passed: false,
            error_kind: kind,
            message,
            suggested_action,
        }
    }

    /// Whether the environment is ready.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// The diagnosed failure category.
    pub fn error_kind(&self) -> ErrorKind {
        self.error_kind
    }

    /// What failed, including captured diagnostic output.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// How to fix it.
    pub fn suggested_action(&self) -> &str {
        &self.suggested_action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_has_no_text() {
        let result = CheckResult::ready();
        assert!(result.passed());
        assert_eq!(result.error_kind(), ErrorKind::None);
        assert!(result.message().is_empty());
        assert!(result.suggested_action().is_empty());
    }

    #[test]
    fn failed_carries_kind_and_text() {
        let result = CheckResult::failed(
            ErrorKind::DaemonNotRunning,
            "Docker daemon is not running.",
            "sudo systemctl start docker",
        );
        assert!(!result.passed());
        assert_eq!(result.error_kind(), ErrorKind::DaemonNotRunning);
        assert!(result.message().contains("not running"));
        assert!(result.suggested_action().contains("systemctl"));
    }

    #[test]
    #[should_panic(expected = "error kind")]
    #[cfg(debug_assertions)]
    fn failed_rejects_none_kind() {
        let _ = CheckResult::failed(ErrorKind::None, "msg", "action");
    }

    #[test]
    fn serializes_snake_case() {
        let result = CheckResult::failed(
            ErrorKind::GroupMembershipNotRefreshed,
            "session is stale",
            "log out and back in",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["passed"], false);
        assert_eq!(json["error_kind"], "group_membership_not_refreshed");
        assert_eq!(json["suggested_action"], "log out and back in");
    }

    #[test]
    fn labels_are_distinct() {
        let kinds = [
            ErrorKind::None,
            ErrorKind::RuntimeNotInstalled,
            ErrorKind::DaemonNotRunning,
            ErrorKind::PermissionDenied,
            ErrorKind::GroupMembershipNotRefreshed,
        ];
        let mut labels: Vec<_> = kinds.iter().map(|k| k.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), kinds.len());
    }
}
