//! berth - container dashboard pre-flight checks.
//!
//! Before the dashboard talks to Docker or Podman, berth verifies that the
//! runtime is installed, that its daemon is reachable, and that the current
//! user may use it. Failures come back as data with copy-pasteable remedies.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - User configuration loading and saving
//! - [`error`] - Error types and result aliases
//! - [`preflight`] - The readiness pipeline and host observation
//! - [`ui`] - Spinners, prompts, and terminal output
//!
//! # Example
//!
//! ```
//! use berth::preflight::{Diagnostic, MockSystem, Platform, ReadinessChecker, RuntimeProfile};
//!
//! let system = MockSystem::new()
//!     .with_commands(&["docker"])
//!     .with_diagnostic(Diagnostic::ok());
//! let checker = ReadinessChecker::new(&system, Platform::Unix, RuntimeProfile::default());
//! assert!(checker.run_pre_checks().passed());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod preflight;
pub mod ui;

pub use error::{BerthError, Result};
