//! Platform strategy for remedies.
//!
//! macOS runs the runtime inside a desktop application and has no group-based
//! socket permissions. Everything else is treated as a Unix host whose daemon
//! is managed by an init system, detected by looking up its control command on PATH.

use super::runtime::RuntimeProfile;
use super::system::SystemQuery;

/// Init systems, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSystem {
    Systemd,
    OpenRc,
    Runit,
    SysV,
}

/// Ordered detection table: the first control command found on PATH wins.
/// SysV `service` is the fallback and is never looked up.
const INIT_COMMANDS: &[(&str, InitSystem)] = &[
    ("systemctl", InitSystem::Systemd),
    ("rc-service", InitSystem::OpenRc),
    ("sv", InitSystem::Runit),
];

impl InitSystem {
    /// Detect the active init system by looking up its control command.
    pub fn detect(system: &dyn SystemQuery) -> Self {
        INIT_COMMANDS
            .iter()
            .find(|(cmd, _)| system.command_exists(cmd))
            .map(|&(_, init)| init)
            .unwrap_or(InitSystem::SysV)
    }

    /// Command that starts `service`.
    pub fn start_command(&self, service: &str) -> String {
        match self {
            InitSystem::Systemd => format!("sudo systemctl start {}", service),
            InitSystem::OpenRc => format!("sudo rc-service {} start", service),
            InitSystem::Runit => format!("sudo sv up {}", service),
            InitSystem::SysV => format!("sudo service {} start", service),
        }
    }

    /// Command that restarts `service`.
    pub fn restart_command(&self, service: &str) -> String {
        match self {
            InitSystem::Systemd => format!("sudo systemctl restart {}", service),
            InitSystem::OpenRc => format!("sudo rc-service {} restart", service),
            InitSystem::Runit => format!("sudo sv restart {}", service),
            InitSystem::SysV => format!("sudo service {} restart", service),
        }
    }
}

/// Host platform, selected once from the OS identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Unix,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identity string (`macos`, `darwin`, `linux`, ...) to a platform.
    pub fn from_os(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "macos" | "darwin" => Platform::MacOs,
            _ => Platform::Unix,
        }
    }

    /// Whether socket access is governed by Unix group membership.
    pub fn group_based_permissions(&self) -> bool {
        matches!(self, Platform::Unix)
    }

    /// How to start the runtime daemon.
    pub fn start_command(&self, profile: &RuntimeProfile, system: &dyn SystemQuery) -> String {
        match self {
            Platform::MacOs => format!("Start {} application", profile.kind().desktop_app()),
            Platform::Unix => {
                InitSystem::detect(system).start_command(profile.kind().service_name())
            }
        }
    }

    /// How to restart the runtime daemon.
    pub fn restart_command(&self, profile: &RuntimeProfile, system: &dyn SystemQuery) -> String {
        match self {
            Platform::MacOs => format!("Restart {} application", profile.kind().desktop_app()),
            Platform::Unix => {
                InitSystem::detect(system).restart_command(profile.kind().service_name())
            }
        }
    }
}
