//! Scripted host for testing.
//!
//! `MockSystem` implements [`SystemQuery`] from fixed answers and records
//! every query so tests can assert which host facts were consulted.
//!
//! # Example
//!
//! ```
//! use berth::preflight::{Diagnostic, MockSystem, SystemQuery};
//!
//! let system = MockSystem::new()
//!     .with_commands(&["docker", "systemctl"])
//!     .with_diagnostic(Diagnostic::failed("Cannot connect to the Docker daemon"));
//!
//! assert!(system.command_exists("docker"));
//! assert!(!system.run_diagnostic("docker").success);
//! assert_eq!(system.diagnostic_runs(), 1);
//! ```

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::Path;

use crate::error::{BerthError, Result};

use super::system::{Diagnostic, SocketAccess, SystemQuery};

/// Host double with scripted answers.
#[derive(Debug)]
pub struct MockSystem {
    commands: HashSet<String>,
    diagnostics: RefCell<VecDeque<Diagnostic>>,
    default_diagnostic: Diagnostic,
    group_database: Option<String>,
    username: Option<String>,
    active_groups: Option<Vec<String>>,
    socket: SocketAccess,
    calls: RefCell<Vec<String>>,
}

impl Default for MockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSystem {
    /// A host with nothing on PATH, a succeeding diagnostic, an empty group
    /// database, user `alice` with no active groups, and an accessible socket.
    pub fn new() -> Self {
        Self {
            commands: HashSet::new(),
            diagnostics: RefCell::new(VecDeque::new()),
            default_diagnostic: Diagnostic::ok(),
            group_database: Some(String::new()),
            username: Some("alice".to_string()),
            active_groups: Some(Vec::new()),
            socket: SocketAccess::Granted,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Put executables on the fake PATH.
    pub fn with_commands(mut self, names: &[&str]) -> Self {
        self.commands.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Answer every diagnostic run with `diagnostic` once the queue is empty.
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.default_diagnostic = diagnostic;
        self
    }

    /// Answer the next diagnostic runs in order, before falling back to the default.
    pub fn queue_diagnostics(self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics.borrow_mut().extend(diagnostics);
        self
    }

    pub fn with_group_database(mut self, text: &str) -> Self {
        self.group_database = Some(text.to_string());
        self
    }

    /// Make group database reads fail.
    pub fn without_group_database(mut self) -> Self {
        self.group_database = None;
        self
    }

    pub fn with_username(mut self, name: &str) -> Self {
        self.username = Some(name.to_string());
        self
    }

    /// Make the user lookup fail.
    pub fn without_username(mut self) -> Self {
        self.username = None;
        self
    }

    pub fn with_active_groups(mut self, groups: &[&str]) -> Self {
        self.active_groups = Some(groups.iter().map(|g| g.to_string()).collect());
        self
    }

    /// Make the active-groups lookup fail.
    pub fn without_active_groups(mut self) -> Self {
        self.active_groups = None;
        self
    }

    pub fn with_socket_access(mut self, access: SocketAccess) -> Self {
        self.socket = access;
        self
    }

    /// Every query made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of diagnostic subprocesses that would have been spawned.
    pub fn diagnostic_runs(&self) -> usize {
        self.count("run_diagnostic")
    }

    /// Commands looked up on PATH, in order.
    pub fn looked_up_commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.strip_prefix("command_exists:"))
            .map(String::from)
            .collect()
    }

    /// Whether any group, user or socket fact was consulted.
    pub fn consulted_permissions(&self) -> bool {
        self.count("group_database_text") > 0
            || self.count("current_username") > 0
            || self.count("active_groups") > 0
            || self.count("socket_access") > 0
    }

    fn count(&self, query: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split(':').next() == Some(query))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl SystemQuery for MockSystem {
    fn command_exists(&self, name: &str) -> bool {
        self.record(format!("command_exists:{}", name));
        self.commands.contains(name)
    }

    fn run_diagnostic(&self, binary: &str) -> Diagnostic {
        self.record(format!("run_diagnostic:{}", binary));
        self.diagnostics
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.default_diagnostic.clone())
    }

    fn group_database_text(&self, group: &str) -> io::Result<String> {
        self.record(format!("group_database_text:{}", group));
        self.group_database
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "group database unavailable"))
    }

    fn current_username(&self) -> Result<String> {
        self.record("current_username".to_string());
        self.username.clone().ok_or_else(|| BerthError::UserLookup {
            message: "no passwd entry".to_string(),
        })
    }

    fn active_groups(&self) -> Result<Vec<String>> {
        self.record("active_groups".to_string());
        self.active_groups
            .clone()
            .ok_or_else(|| BerthError::CommandFailed {
                command: "id -nG".to_string(),
                code: Some(1),
            })
    }

    fn socket_access(&self, path: &Path) -> SocketAccess {
        self.record(format!("socket_access:{}", path.display()));
        self.socket.clone()
    }
}
