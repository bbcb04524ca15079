//! Daemon error classification.
//!
//! Matches the runtime's `info` stderr against known phrasings to decide
//! which diagnosis branch applies.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(
    RE_DAEMON_UNREACHABLE,
    r"(?i)cannot connect to the (docker|podman) daemon|is the docker daemon running|cannot connect to podman"
);
lazy_regex!(RE_SOCKET_PERMISSION, r"(?i)permission denied|dial unix");

/// Coarse category of a failed `info` diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSignal {
    /// The client could not reach a daemon at all.
    DaemonUnreachable,
    /// The client reached the socket but was refused.
    SocketPermission,
    /// Anything else.
    Other,
}

/// Classify diagnostic stderr. Daemon phrasing wins over permission phrasing.
pub fn classify_stderr(stderr: &str) -> FailureSignal {
    if RE_DAEMON_UNREACHABLE.is_match(stderr) {
        FailureSignal::DaemonUnreachable
    } else if RE_SOCKET_PERMISSION.is_match(stderr) {
        FailureSignal::SocketPermission
    } else {
        FailureSignal::Other
    }
}
