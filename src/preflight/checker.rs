//! The readiness pipeline.
//!
//! Two ordered checks run against the host: is the runtime installed, and
//! does its daemon answer. The first failure ends the run. A failing daemon
//! diagnostic is classified from its stderr into a specific diagnosis with a
//! platform-appropriate remedy.

use super::groups::find_group;
use super::patterns::{classify_stderr, FailureSignal};
use super::platform::Platform;
use super::result::{CheckResult, ErrorKind};
use super::runtime::RuntimeProfile;
use super::system::{SocketAccess, SystemQuery};

/// Host facts that decide how a permission failure is diagnosed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionFacts {
    /// The runtime group is present in the group database.
    pub group_exists: bool,
    /// The invoking user is listed as a member of that group.
    pub in_group_file: bool,
    /// The group is attached to the current session.
    pub in_active_groups: bool,
    /// Control socket accessibility.
    pub socket: SocketAccess,
}

/// Runs the pre-flight pipeline against one host.
pub struct ReadinessChecker<'a> {
    system: &'a dyn SystemQuery,
    platform: Platform,
    profile: RuntimeProfile,
}

impl<'a> ReadinessChecker<'a> {
    pub fn new(system: &'a dyn SystemQuery, platform: Platform, profile: RuntimeProfile) -> Self {
        Self {
            system,
            platform,
            profile,
        }
    }

    pub fn profile(&self) -> &RuntimeProfile {
        &self.profile
    }

    /// Run every check in order and return the first failure, or success.
    pub fn run_pre_checks(&self) -> CheckResult {
        let result = self.check_installed();
        if !result.passed() {
            tracing::info!("Pre-flight failed: {}", result.error_kind().label());
            return result;
        }

        let result = self.check_daemon();
        if result.passed() {
            tracing::info!("{} is ready", self.profile.display_name());
        } else {
            tracing::info!("Pre-flight failed: {}", result.error_kind().label());
        }
        result
    }

    /// Check 1: the runtime executable is on PATH.
    pub fn check_installed(&self) -> CheckResult {
        let binary = self.profile.binary();
        tracing::debug!("Looking up {} on PATH", binary);

        if self.system.command_exists(binary) {
            return CheckResult::ready();
        }

        let name = self.profile.display_name();
        CheckResult::failed(
            ErrorKind::RuntimeNotInstalled,
            format!("{} is not installed or not found in PATH", name),
            format!(
                "Please install {} to use this application.\n\nInstallation guide: {}",
                name,
                self.profile.kind().install_url()
            ),
        )
    }

    /// Check 2: the daemon answers the `info` diagnostic.
    pub fn check_daemon(&self) -> CheckResult {
        let diagnostic = self.system.run_diagnostic(self.profile.binary());
        if diagnostic.success {
            return CheckResult::ready();
        }

        let stderr = diagnostic.stderr.trim_end();
        tracing::debug!("Diagnostic failed: {}", stderr);

        match classify_stderr(stderr) {
            FailureSignal::DaemonUnreachable => self.daemon_not_running(stderr),
            FailureSignal::SocketPermission => self.permission_problem(stderr),
            FailureSignal::Other => {
                // A second failure means the daemon is really down; a success
                // means the first failure was transient.
                if self.system.run_diagnostic(self.profile.binary()).success {
                    tracing::debug!("Diagnostic succeeded on re-invocation");
                    self.unclassified_failure(stderr)
                } else {
                    self.daemon_not_running(stderr)
                }
            }
        }
    }

    /// Collect group and socket facts. Lookups that fail count as "no".
    pub fn permission_facts(&self) -> PermissionFacts {
        let group = self.profile.group();

        let entry = match self.system.group_database_text(group) {
            Ok(text) => find_group(&text, group),
            Err(e) => {
                tracing::warn!("Could not read group database: {}", e);
                None
            }
        };

        let in_group_file = match (&entry, self.system.current_username()) {
            (Some(entry), Ok(user)) => entry.has_member(&user),
            (Some(_), Err(e)) => {
                tracing::warn!("Could not determine current user: {}", e);
                false
            }
            (None, _) => false,
        };

        let in_active_groups = match self.system.active_groups() {
            Ok(groups) => groups.iter().any(|g| g == group),
            Err(e) => {
                tracing::warn!("Could not determine active groups: {}", e);
                false
            }
        };

        let socket = self.system.socket_access(self.profile.socket_path());

        let facts = PermissionFacts {
            group_exists: entry.is_some(),
            in_group_file,
            in_active_groups,
            socket,
        };
        tracing::debug!("Permission facts: {:?}", facts);
        facts
    }

    fn runtime_error(&self, stderr: &str) -> String {
        format!("{} error:\n{}", self.profile.display_name(), stderr)
    }

    fn daemon_not_running(&self, stderr: &str) -> CheckResult {
        let name = self.profile.display_name();
        CheckResult::failed(
            ErrorKind::DaemonNotRunning,
            format!(
                "{} daemon is not running.\n\n{}",
                name,
                self.runtime_error(stderr)
            ),
            format!(
                "Start the {} service:\n\n  {}\n\nTroubleshooting: {}",
                name,
                self.platform.start_command(&self.profile, self.system),
                self.profile.kind().daemon_troubleshooting_url()
            ),
        )
    }

    fn permission_problem(&self, stderr: &str) -> CheckResult {
        if !self.platform.group_based_permissions() {
            return self.desktop_unreachable(stderr);
        }

        let facts = self.permission_facts();
        let group = self.profile.group();
        let kind = self.profile.kind();

        if facts.in_group_file && facts.in_active_groups {
            if facts.socket.denies_access() {
                return self.socket_permissions(stderr, &facts.socket);
            }
            return self.unexplained_denial(stderr);
        }

        if facts.in_group_file {
            return CheckResult::failed(
                ErrorKind::GroupMembershipNotRefreshed,
                format!(
                    "You're in the {} group but your session hasn't been refreshed.\n\n{}",
                    group,
                    self.runtime_error(stderr)
                ),
                format!(
                    "Log out and log back in to refresh your group membership.\n\n\
                     Or start a shell with the new group right away:\n\n  newgrp {}\n\n\
                     More info: {}",
                    group,
                    kind.non_root_url()
                ),
            );
        }

        let message = format!(
            "Cannot communicate with the {} daemon.\n\n{}",
            self.profile.display_name(),
            self.runtime_error(stderr)
        );

        if !facts.group_exists {
            return CheckResult::failed(
                ErrorKind::PermissionDenied,
                message,
                format!(
                    "The '{group}' group doesn't exist. Create it and add your user:\n\n\
                     \x20 sudo groupadd {group}\n\
                     \x20 sudo usermod -aG {group} $USER\n\n\
                     Then log out and back in.\n\n\
                     Guide: {url}",
                    group = group,
                    url = kind.non_root_url()
                ),
            );
        }

        CheckResult::failed(
            ErrorKind::PermissionDenied,
            message,
            format!(
                "Add your user to the '{group}' group:\n\n\
                 \x20 sudo usermod -aG {group} $USER\n\n\
                 Then log out and back in.\n\n\
                 Guide: {url}",
                group = group,
                url = kind.non_root_url()
            ),
        )
    }

    fn socket_permissions(&self, stderr: &str, socket: &SocketAccess) -> CheckResult {
        let group = self.profile.group();
        let socket_path = self.profile.socket_path().display().to_string();
        CheckResult::failed(
            ErrorKind::PermissionDenied,
            format!(
                "You're in the {} group, but the socket has incorrect permissions.\n\n\
                 Socket error: {}\n\n{}",
                group,
                socket.describe(self.profile.socket_path()),
                self.runtime_error(stderr)
            ),
            format!(
                "Fix the {name} socket permissions:\n\n\
                 \x20 sudo chown root:{group} {socket}\n\
                 \x20 sudo chmod 660 {socket}\n\n\
                 Or restart {name} to recreate the socket:\n\n  {restart}\n\n\
                 Guide: {url}",
                name = self.profile.display_name(),
                group = group,
                socket = socket_path,
                restart = self.platform.restart_command(&self.profile, self.system),
                url = self.profile.kind().post_install_url()
            ),
        )
    }

    fn unexplained_denial(&self, stderr: &str) -> CheckResult {
        let name = self.profile.display_name();
        CheckResult::failed(
            ErrorKind::PermissionDenied,
            format!(
                "You're in the {} group and the socket looks accessible, but {} still refused the connection.\n\n{}",
                self.profile.group(),
                name,
                self.runtime_error(stderr)
            ),
            format!(
                "Restart {} to recreate the socket:\n\n  {}\n\n\
                 If DOCKER_HOST or CONTAINER_HOST is set, make sure it points at {}.\n\n\
                 Guide: {}",
                name,
                self.platform.restart_command(&self.profile, self.system),
                self.profile.socket_path().display(),
                self.profile.kind().post_install_url()
            ),
        )
    }

    fn desktop_unreachable(&self, stderr: &str) -> CheckResult {
        let app = self.profile.kind().desktop_app();
        CheckResult::failed(
            ErrorKind::PermissionDenied,
            format!("Cannot connect to {}.\n\n{}", app, self.runtime_error(stderr)),
            format!(
                "Make sure {app} is running:\n\n\
                 1. Open the {app} application\n\
                 2. Wait for it to start completely\n\
                 3. Check that the menu bar icon shows it's running\n\n\
                 If issues persist, try restarting {app}.\n\n\
                 {app} guide: {url}",
                app = app,
                url = self.profile.kind().desktop_guide_url()
            ),
        )
    }

    fn unclassified_failure(&self, stderr: &str) -> CheckResult {
        let name = self.profile.display_name();
        CheckResult::failed(
            ErrorKind::DaemonNotRunning,
            self.runtime_error(stderr),
            format!(
                "Check your {} installation and try:\n\n  {}\n\n{} docs: {}",
                name,
                self.platform.start_command(&self.profile, self.system),
                name,
                self.profile.kind().docs_url()
            ),
        )
    }
}

/// Run the pipeline with a fresh checker.
pub fn run_pre_checks(
    system: &dyn SystemQuery,
    platform: Platform,
    profile: RuntimeProfile,
) -> CheckResult {
    ReadinessChecker::new(system, platform, profile).run_pre_checks()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::mock::MockSystem;
    use crate::preflight::runtime::RuntimeKind;
    use crate::preflight::system::Diagnostic;

    const DAEMON_DOWN: &str = "Cannot connect to the Docker daemon at unix:///var/run/docker.sock. \
                               Is the docker daemon running?";
    const PERMISSION: &str = "permission denied while trying to connect to the Docker daemon socket \
                              at unix:///var/run/docker.sock: dial unix /var/run/docker.sock: \
                              connect: permission denied";
    const GROUPS_WITH_ALICE: &str = "root:x:0:\ndocker:x:999:alice,bob\n";
    const GROUPS_WITHOUT_ALICE: &str = "root:x:0:\ndocker:x:999:bob\n";
    const GROUPS_WITHOUT_DOCKER: &str = "root:x:0:\ndockerroot:x:980:alice\n";

    fn docker() -> RuntimeProfile {
        RuntimeProfile::new(RuntimeKind::Docker)
    }

    fn check(system: &MockSystem, platform: Platform) -> CheckResult {
        run_pre_checks(system, platform, docker())
    }

    fn installed() -> MockSystem {
        MockSystem::new().with_commands(&["docker"])
    }

    #[test]
    fn missing_runtime_never_runs_diagnostic() {
        let system = MockSystem::new().with_commands(&["systemctl"]);
        let result = check(&system, Platform::Unix);

        assert!(!result.passed());
        assert_eq!(result.error_kind(), ErrorKind::RuntimeNotInstalled);
        assert!(result.message().contains("not found in PATH"));
        assert!(result
            .suggested_action()
            .contains("https://docs.docker.com/engine/install/"));
        assert_eq!(system.diagnostic_runs(), 0);
    }

    #[test]
    fn successful_diagnostic_passes_regardless_of_host() {
        let system = installed()
            .with_diagnostic(Diagnostic::ok())
            .without_group_database()
            .without_username()
            .with_socket_access(SocketAccess::Missing);
        let result = check(&system, Platform::Unix);

        assert_eq!(result, CheckResult::ready());
        assert_eq!(system.diagnostic_runs(), 1);
        assert!(!system.consulted_permissions());
    }

    #[test]
    fn daemon_down_uses_first_init_command() {
        let system = installed()
            .with_commands(&["sv", "rc-service", "systemctl"])
            .with_diagnostic(Diagnostic::failed(DAEMON_DOWN));
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::DaemonNotRunning);
        assert!(result.suggested_action().contains("sudo systemctl start docker"));
        assert!(result.message().contains(DAEMON_DOWN));
        assert!(!system.consulted_permissions());
    }

    #[test]
    fn daemon_down_with_openrc() {
        let system = installed()
            .with_commands(&["sv", "rc-service"])
            .with_diagnostic(Diagnostic::failed(DAEMON_DOWN));
        let result = check(&system, Platform::Unix);
        assert!(result.suggested_action().contains("sudo rc-service docker start"));
    }

    #[test]
    fn daemon_down_with_runit() {
        let system = installed()
            .with_commands(&["sv"])
            .with_diagnostic(Diagnostic::failed(DAEMON_DOWN));
        let result = check(&system, Platform::Unix);
        assert!(result.suggested_action().contains("sudo sv up docker"));
    }

    #[test]
    fn daemon_down_without_init_command_uses_service() {
        let system = installed().with_diagnostic(Diagnostic::failed(DAEMON_DOWN));
        let result = check(&system, Platform::Unix);
        assert!(result.suggested_action().contains("sudo service docker start"));
        assert!(result.suggested_action().contains("troubleshoot"));
    }

    #[test]
    fn stale_session_is_group_not_refreshed() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE)
            .with_active_groups(&["alice", "wheel"]);
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::GroupMembershipNotRefreshed);
        assert!(result.suggested_action().contains("Log out and log back in"));
    }

    #[test]
    fn missing_group_suggests_creating_it() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITHOUT_DOCKER);
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.suggested_action().contains("sudo groupadd docker"));
        assert!(result.suggested_action().contains("doesn't exist"));
    }

    #[test]
    fn existing_group_suggests_adding_user() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITHOUT_ALICE);
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.suggested_action().contains("sudo usermod -aG docker $USER"));
        assert!(!result.suggested_action().contains("groupadd"));
    }

    #[test]
    fn active_member_with_denied_socket_gets_socket_fix() {
        let system = installed()
            .with_commands(&["systemctl"])
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE)
            .with_active_groups(&["alice", "docker"])
            .with_socket_access(SocketAccess::PermissionDenied(
                "Socket exists but insufficient permissions".to_string(),
            ));
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.message().contains("incorrect permissions"));
        assert!(result
            .suggested_action()
            .contains("sudo chown root:docker /var/run/docker.sock"));
        assert!(result.suggested_action().contains("sudo systemctl restart docker"));
    }

    #[test]
    fn active_member_with_missing_socket_gets_socket_fix() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE)
            .with_active_groups(&["docker"])
            .with_socket_access(SocketAccess::Missing);
        let result = check(&system, Platform::Unix);

        assert!(result.message().contains("Socket not found at /var/run/docker.sock"));
        assert!(result.suggested_action().contains("sudo service docker restart"));
    }

    #[test]
    fn active_member_with_accessible_socket_suggests_restart() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE)
            .with_active_groups(&["docker"]);
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.suggested_action().contains("sudo service docker restart"));
        assert!(!result.suggested_action().contains("usermod"));
    }

    #[test]
    fn unreadable_facts_degrade_to_add_user_or_create_group() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .without_group_database()
            .without_username()
            .without_active_groups();
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.suggested_action().contains("groupadd"));
    }

    #[test]
    fn unknown_user_is_not_a_member() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE)
            .without_username()
            .with_active_groups(&[]);
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.suggested_action().contains("Add your user"));
    }

    #[test]
    fn macos_permission_skips_group_checks() {
        let system = installed()
            .with_commands(&["systemctl"])
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE);
        let result = check(&system, Platform::MacOs);

        assert_eq!(result.error_kind(), ErrorKind::PermissionDenied);
        assert!(result.suggested_action().contains("Docker Desktop"));
        assert!(!system.consulted_permissions());
    }

    #[test]
    fn macos_daemon_down_references_desktop_app() {
        let system = installed()
            .with_commands(&["systemctl"])
            .with_diagnostic(Diagnostic::failed(DAEMON_DOWN));
        let result = check(&system, Platform::MacOs);

        assert_eq!(result.error_kind(), ErrorKind::DaemonNotRunning);
        assert!(result
            .suggested_action()
            .contains("Start Docker Desktop application"));
        assert!(!system.consulted_permissions());
        assert!(!system.looked_up_commands().contains(&"systemctl".to_string()));
    }

    #[test]
    fn unclassified_failure_that_persists_is_daemon_down() {
        let system = installed().with_diagnostic(Diagnostic::failed("context deadline exceeded"));
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::DaemonNotRunning);
        assert!(result.message().contains("daemon is not running"));
        assert_eq!(system.diagnostic_runs(), 2);
    }

    #[test]
    fn transient_unclassified_failure_falls_back() {
        let system = installed()
            .with_commands(&["systemctl"])
            .queue_diagnostics(vec![
                Diagnostic::failed("unexpected EOF"),
                Diagnostic::ok(),
            ]);
        let result = check(&system, Platform::Unix);

        assert_eq!(result.error_kind(), ErrorKind::DaemonNotRunning);
        assert!(result.message().contains("unexpected EOF"));
        assert!(result.suggested_action().contains("Check your Docker installation"));
        assert!(result.suggested_action().contains("https://docs.docker.com/"));
        assert!(result.suggested_action().contains("sudo systemctl start docker"));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database(GROUPS_WITH_ALICE)
            .with_active_groups(&[]);
        let checker = ReadinessChecker::new(&system, Platform::Unix, docker());

        assert_eq!(checker.run_pre_checks(), checker.run_pre_checks());
    }

    #[test]
    fn podman_profile_uses_its_own_names() {
        let system = MockSystem::new()
            .with_commands(&["podman", "systemctl"])
            .with_diagnostic(Diagnostic::failed("Error: Cannot connect to Podman."));
        let result = run_pre_checks(&system, Platform::Unix, RuntimeProfile::new(RuntimeKind::Podman));

        assert_eq!(result.error_kind(), ErrorKind::DaemonNotRunning);
        assert!(result.message().starts_with("Podman daemon is not running."));
        assert!(result.suggested_action().contains("sudo systemctl start podman"));
        assert_eq!(system.calls()[0], "command_exists:podman");
    }

    #[test]
    fn custom_group_and_socket_flow_into_remedies() {
        let profile = docker()
            .with_group("containers")
            .with_socket_path("/run/user/1000/docker.sock");
        let system = installed()
            .with_diagnostic(Diagnostic::failed(PERMISSION))
            .with_group_database("containers:x:1001:alice\n")
            .with_active_groups(&["containers"])
            .with_socket_access(SocketAccess::Missing);
        let result = run_pre_checks(&system, Platform::Unix, profile);

        assert!(result
            .suggested_action()
            .contains("sudo chown root:containers /run/user/1000/docker.sock"));
    }

    #[test]
    fn permission_facts_report_each_fact() {
        let system = installed()
            .with_group_database(GROUPS_WITH_ALICE)
            .with_active_groups(&["docker"])
            .with_socket_access(SocketAccess::Missing);
        let checker = ReadinessChecker::new(&system, Platform::Unix, docker());

        assert_eq!(
            checker.permission_facts(),
            PermissionFacts {
                group_exists: true,
                in_group_file: true,
                in_active_groups: true,
                socket: SocketAccess::Missing,
            }
        );
    }
}
