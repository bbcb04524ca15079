//! Host observation.
//!
//! The readiness checker never touches the host directly. Everything it
//! needs to know goes through [`SystemQuery`], which keeps classification
//! deterministic under test. [`HostSystem`] is the real implementation,
//! backed by PATH lookups, subprocesses, the group database and `nix`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BerthError, Result};

/// Default location of the group database.
pub const DEFAULT_GROUP_FILE: &str = "/etc/group";

/// Outcome of the runtime's `info` diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Whether the command exited zero.
    pub success: bool,
    /// Captured standard error.
    pub stderr: String,
}

impl Diagnostic {
    pub fn ok() -> Self {
        Self {
            success: true,
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// Whether the process can open the control socket read-write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketAccess {
    /// Read-write access is allowed.
    Granted,
    /// Nothing exists at the socket path.
    Missing,
    /// The socket exists but the process lacks permission.
    PermissionDenied(String),
    /// Access could not be determined for another reason.
    Unavailable(String),
}

impl SocketAccess {
    /// Missing sockets and permission errors both mean "no access".
    pub fn denies_access(&self) -> bool {
        matches!(self, SocketAccess::Missing | SocketAccess::PermissionDenied(_))
    }

    /// Description for error reports.
    pub fn describe(&self, path: &Path) -> String {
        match self {
            SocketAccess::Granted => format!("{} is accessible", path.display()),
            SocketAccess::Missing => format!("Socket not found at {}", path.display()),
            SocketAccess::PermissionDenied(msg) | SocketAccess::Unavailable(msg) => msg.clone(),
        }
    }
}

/// Narrow interface to the host environment.
pub trait SystemQuery {
    /// Whether an executable named `name` is on the search path.
    fn command_exists(&self, name: &str) -> bool;

    /// Run `<binary> info` and capture its exit status and stderr.
    fn run_diagnostic(&self, binary: &str) -> Diagnostic;

    /// Group database text relevant to `group`.
    ///
    /// Implementations may return the whole database or only the lines for
    /// `group`; callers parse the text either way.
    fn group_database_text(&self, group: &str) -> io::Result<String>;

    /// Login name of the invoking user.
    fn current_username(&self) -> Result<String>;

    /// Group names attached to the current session.
    fn active_groups(&self) -> Result<Vec<String>>;

    /// Whether the control socket at `path` is usable.
    fn socket_access(&self, path: &Path) -> SocketAccess;
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Names containing a path separator are checked as-is.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return (direct.is_file() && is_executable(direct)).then(|| direct.to_path_buf());
    }

    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Split `id -nG` output into group names.
pub fn parse_id_groups(output: &str) -> Vec<String> {
    output.split_whitespace().map(String::from).collect()
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// The real host.
#[derive(Debug, Clone)]
pub struct HostSystem {
    path: Vec<PathBuf>,
    group_file: PathBuf,
}

impl HostSystem {
    /// Host view using the process PATH and `/etc/group`.
    pub fn new() -> Self {
        Self {
            path: parse_system_path(),
            group_file: PathBuf::from(DEFAULT_GROUP_FILE),
        }
    }

    /// Read group data from a different file.
    pub fn with_group_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.group_file = path.into();
        self
    }

    pub fn group_file(&self) -> &Path {
        &self.group_file
    }

    fn grep_group(&self, group: &str) -> io::Result<String> {
        // Fixed-string match; find_group does the exact first-field comparison
        let output = Command::new("grep")
            .arg("-F")
            .arg("-e")
            .arg(format!("{}:", group))
            .arg(&self.group_file)
            .stdin(Stdio::null())
            .output()?;

        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            // No matching line
            Some(1) => Ok(String::new()),
            _ => Err(io::Error::other(format!(
                "grep failed on {}: {}",
                self.group_file.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }

    fn id_groups(&self) -> Result<Vec<String>> {
        let output = Command::new("id")
            .arg("-nG")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(BerthError::CommandFailed {
                command: "id -nG".to_string(),
                code: output.status.code(),
            });
        }

        Ok(parse_id_groups(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for HostSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemQuery for HostSystem {
    fn command_exists(&self, name: &str) -> bool {
        resolve_tool_path(name, &self.path).is_some()
    }

    fn run_diagnostic(&self, binary: &str) -> Diagnostic {
        let program = resolve_tool_path(binary, &self.path).unwrap_or_else(|| PathBuf::from(binary));
        tracing::debug!("Running {} info", program.display());

        match Command::new(&program)
            .arg("info")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
        {
            Ok(output) => Diagnostic {
                success: output.status.success(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => Diagnostic::failed(format!("failed to run {} info: {}", binary, e)),
        }
    }

    fn group_database_text(&self, group: &str) -> io::Result<String> {
        if self.command_exists("grep") {
            self.grep_group(group)
        } else {
            tracing::debug!("grep not found, reading {} directly", self.group_file.display());
            fs::read_to_string(&self.group_file)
        }
    }

    fn current_username(&self) -> Result<String> {
        if let Some(name) = os::login_name() {
            return Ok(name);
        }
        for var in ["USER", "LOGNAME", "USERNAME"] {
            if let Ok(name) = std::env::var(var) {
                if !name.trim().is_empty() {
                    return Ok(name);
                }
            }
        }
        Err(BerthError::UserLookup {
            message: "no passwd entry for the current uid and no USER variable".to_string(),
        })
    }

    fn active_groups(&self) -> Result<Vec<String>> {
        if self.command_exists("id") {
            self.id_groups()
        } else {
            tracing::debug!("id not found, asking the kernel for supplementary groups");
            Ok(os::process_group_names()?)
        }
    }

    fn socket_access(&self, path: &Path) -> SocketAccess {
        os::socket_access(path)
    }
}

#[cfg(unix)]
mod os {
    use std::io;
    use std::path::Path;

    use nix::errno::Errno;
    use nix::unistd::{self, AccessFlags, Gid, Group, Uid, User};

    use super::SocketAccess;

    pub(super) fn login_name() -> Option<String> {
        User::from_uid(Uid::current()).ok().flatten().map(|u| u.name)
    }

    #[cfg(not(any(target_os = "macos", target_os = "ios")))]
    fn supplementary_groups() -> io::Result<Vec<Gid>> {
        Ok(unistd::getgroups()?)
    }

    // nix has no getgroups on Darwin; only the effective group is reported
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    fn supplementary_groups() -> io::Result<Vec<Gid>> {
        Ok(Vec::new())
    }

    pub(super) fn process_group_names() -> io::Result<Vec<String>> {
        let mut gids = supplementary_groups()?;
        let egid = unistd::getegid();
        if !gids.contains(&egid) {
            gids.insert(0, egid);
        }

        Ok(gids
            .into_iter()
            .filter_map(|gid| Group::from_gid(gid).ok().flatten())
            .map(|g| g.name)
            .collect())
    }

    pub(super) fn socket_access(path: &Path) -> SocketAccess {
        match unistd::access(path, AccessFlags::R_OK | AccessFlags::W_OK) {
            Ok(()) => SocketAccess::Granted,
            Err(Errno::ENOENT) => SocketAccess::Missing,
            Err(e @ (Errno::EACCES | Errno::EPERM)) => SocketAccess::PermissionDenied(format!(
                "Socket exists but insufficient permissions: {}",
                e
            )),
            Err(e) => SocketAccess::Unavailable(format!("Cannot access socket: {}", e)),
        }
    }
}

#[cfg(not(unix))]
mod os {
    use std::fs::OpenOptions;
    use std::io;
    use std::path::Path;

    use super::SocketAccess;

    pub(super) fn login_name() -> Option<String> {
        None
    }

    pub(super) fn process_group_names() -> io::Result<Vec<String>> {
        Ok(Vec::new())
    }

    pub(super) fn socket_access(path: &Path) -> SocketAccess {
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(_) => SocketAccess::Granted,
            Err(e) if e.kind() == io::ErrorKind::NotFound => SocketAccess::Missing,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => SocketAccess::PermissionDenied(
                format!("Socket exists but insufficient permissions: {}", e),
            ),
            Err(e) => SocketAccess::Unavailable(format!("Cannot access socket: {}", e)),
        }
    }
}
