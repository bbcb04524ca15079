//! Configuration schema.
//!
//! ```yaml
//! runtime:
//!   type: podman
//!   binary: /opt/podman/bin/podman
//! checks:
//!   group: podman
//!   socket_path: /run/podman/podman.sock
//!   group_file: /etc/group
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::preflight::system::DEFAULT_GROUP_FILE;
use crate::preflight::{RuntimeKind, RuntimeProfile};

/// Root of the user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BerthConfig {
    /// Which container runtime to talk to.
    pub runtime: RuntimeSettings,

    /// Overrides for the readiness checks.
    #[serde(skip_serializing_if = "CheckSettings::is_empty")]
    pub checks: CheckSettings,
}

/// Runtime selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    #[serde(rename = "type")]
    pub kind: RuntimeKind,

    /// Executable to use instead of the runtime's stock name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
}

/// Pre-flight overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Group that grants socket access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Daemon control socket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,

    /// Group database file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_file: Option<PathBuf>,
}

impl CheckSettings {
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.socket_path.is_none() && self.group_file.is_none()
    }
}

impl BerthConfig {
    /// Runtime profile with every configured override applied.
    pub fn runtime_profile(&self) -> RuntimeProfile {
        let mut profile = RuntimeProfile::new(self.runtime.kind);
        if let Some(binary) = &self.runtime.binary {
            profile = profile.with_binary(binary.clone());
        }
        if let Some(group) = &self.checks.group {
            profile = profile.with_group(group.clone());
        }
        if let Some(socket) = &self.checks.socket_path {
            profile = profile.with_socket_path(socket.clone());
        }
        profile
    }

    /// Group database to consult.
    pub fn group_file(&self) -> PathBuf {
        self.checks
            .group_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GROUP_FILE))
    }
}
