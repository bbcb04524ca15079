//! Container runtime profiles.
//!
//! A profile names everything the checker needs to know about one runtime:
//! the executable to look up, the Unix group that grants socket access, the
//! control socket itself, and the wording and links used in remedies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported container runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    #[default]
    Docker,
    Podman,
}

impl RuntimeKind {
    /// All known runtimes, in selection-menu order.
    pub const ALL: [RuntimeKind; 2] = [RuntimeKind::Docker, RuntimeKind::Podman];

    /// Lowercase identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "docker",
            RuntimeKind::Podman => "podman",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "Docker",
            RuntimeKind::Podman => "Podman",
        }
    }

    /// Service unit managed by the init system.
    pub fn service_name(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "docker",
            RuntimeKind::Podman => "podman",
        }
    }

    /// Desktop application that hosts the daemon on macOS.
    pub fn desktop_app(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "Docker Desktop",
            RuntimeKind::Podman => "Podman Desktop",
        }
    }

    pub fn install_url(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "https://docs.docker.com/engine/install/",
            RuntimeKind::Podman => "https://podman.io/docs/installation",
        }
    }

    pub fn daemon_troubleshooting_url(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "https://docs.docker.com/config/daemon/troubleshoot/",
            RuntimeKind::Podman => {
                "https://github.com/containers/podman/blob/main/troubleshooting.md"
            }
        }
    }

    pub fn docs_url(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "https://docs.docker.com/",
            RuntimeKind::Podman => "https://docs.podman.io/",
        }
    }

    pub fn desktop_guide_url(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "https://docs.docker.com/desktop/install/mac-install/",
            RuntimeKind::Podman => "https://podman-desktop.io/docs/installation/macos-install",
        }
    }

    pub fn post_install_url(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "https://docs.docker.com/engine/install/linux-postinstall/",
            RuntimeKind::Podman => "https://docs.podman.io/en/latest/markdown/podman-system-service.1.html",
        }
    }

    /// Link explaining how to run the runtime without root.
    pub fn non_root_url(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => {
                "https://docs.docker.com/engine/install/linux-postinstall/#manage-docker-as-a-non-root-user"
            }
            RuntimeKind::Podman => {
                "https://github.com/containers/podman/blob/main/docs/tutorials/rootless_tutorial.md"
            }
        }
    }

    fn default_socket(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "/var/run/docker.sock",
            RuntimeKind::Podman => "/run/podman/podman.sock",
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RuntimeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "docker" => Ok(RuntimeKind::Docker),
            "podman" => Ok(RuntimeKind::Podman),
            other => Err(format!(
                "unknown runtime '{}' (expected 'docker' or 'podman')",
                other
            )),
        }
    }
}

/// Concrete runtime settings used by one pre-flight run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeProfile {
    kind: RuntimeKind,
    binary: String,
    group: String,
    socket_path: PathBuf,
}

impl RuntimeProfile {
    /// Profile with the runtime's stock binary, group and socket.
    pub fn new(kind: RuntimeKind) -> Self {
        Self {
            kind,
            binary: kind.id().to_string(),
            group: kind.id().to_string(),
            socket_path: PathBuf::from(kind.default_socket()),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = path.into();
        self
    }

    pub fn kind(&self) -> RuntimeKind {
        self.kind
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn display_name(&self) -> &'static str {
        self.kind.display_name()
    }
}

impl Default for RuntimeProfile {
    fn default() -> Self {
        Self::new(RuntimeKind::Docker)
    }
}
