//! Error types for berth operations.
//!
//! This module defines [`BerthError`], the error type for conditions berth
//! does not anticipate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected environment problems (runtime missing, daemon down, permission
//!   trouble) are not errors; they are reported as a
//!   [`CheckResult`](crate::preflight::CheckResult)
//! - Use `BerthError` for failures that need distinct handling
//! - Use `anyhow::Error` (via `BerthError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for berth operations.
#[derive(Debug, Error)]
pub enum BerthError {
    /// Failed to parse the configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Failed to write the configuration file.
    #[error("Failed to write config at {path}: {message}")]
    ConfigWriteError { path: PathBuf, message: String },

    /// An environment variable holds a value berth cannot use.
    #[error("Invalid value for {var}: {message}")]
    InvalidEnv { var: String, message: String },

    /// No usable configuration location could be determined.
    #[error("Cannot determine config directory: {message}")]
    ConfigLocation { message: String },

    /// The invoking user's identity could not be determined.
    #[error("Cannot determine current user: {message}")]
    UserLookup { message: String },

    /// An interactive prompt was needed but no terminal is attached.
    #[error("{message}")]
    PromptUnavailable { message: String },

    /// Helper command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BerthError {
    /// Process exit code for this error.
    ///
    /// Configuration and usage problems exit with 2 so callers can tell them
    /// apart from a failed readiness check (1).
    pub fn exit_code(&self) -> u8 {
        match self {
            BerthError::ConfigParseError { .. }
            | BerthError::ConfigWriteError { .. }
            | BerthError::InvalidEnv { .. }
            | BerthError::ConfigLocation { .. }
            | BerthError::PromptUnavailable { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for berth operations.
pub type Result<T> = std::result::Result<T, BerthError>;
