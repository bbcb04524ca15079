//! Runtime readiness checks.
//!
//! Before the dashboard starts, berth verifies that the container runtime is
//! installed, that its daemon answers, and that the current user may talk to
//! it. The outcome is a single [`CheckResult`]: either ready, or a diagnosed
//! failure with a remedy the user can copy and paste.
//!
//! # Modules
//!
//! - [`checker`] - The ordered pipeline and failure diagnosis
//! - [`system`] - Host observation behind the [`SystemQuery`] trait
//! - [`platform`] - macOS vs Unix remedies and init system detection
//! - [`runtime`] - Docker and Podman profiles
//! - [`groups`] - Group database parsing
//! - [`patterns`] - Daemon stderr classification
//! - [`mock`] - Scripted host for tests
//!
//! # Example
//!
//! ```
//! use berth::preflight::{run_pre_checks, ErrorKind, MockSystem, Platform, RuntimeProfile};
//!
//! // Nothing on PATH: the runtime is reported missing.
//! let system = MockSystem::new();
//! let result = run_pre_checks(&system, Platform::Unix, RuntimeProfile::default());
//! assert_eq!(result.error_kind(), ErrorKind::RuntimeNotInstalled);
//! assert_eq!(system.diagnostic_runs(), 0);
//! ```

pub mod checker;
pub mod groups;
pub mod mock;
pub mod patterns;
pub mod platform;
pub mod result;
pub mod runtime;
pub mod system;

pub use checker::{run_pre_checks, PermissionFacts, ReadinessChecker};
pub use groups::{find_group, GroupEntry};
pub use mock::MockSystem;
pub use patterns::{classify_stderr, FailureSignal};
pub use platform::{InitSystem, Platform};
pub use result::{CheckResult, ErrorKind};
pub use runtime::{RuntimeKind, RuntimeProfile};
pub use system::{Diagnostic, HostSystem, SocketAccess, SystemQuery};
