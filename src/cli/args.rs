//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::preflight::RuntimeKind;

/// berth - container dashboard with a pre-flight readiness check.
#[derive(Debug, Parser)]
#[command(name = "berth")]
#[command(
    author,
    version,
    about = "Container dashboard with a pre-flight readiness check for Docker and Podman",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides ~/.config/berth/config.yml)
    #[arg(short, long, global = true, env = "BERTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the container runtime is ready (default if no command specified)
    Check(CheckArgs),

    /// Select the container runtime berth checks (prompts when none is given)
    Runtime(RuntimeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Print the verdict as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `runtime` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RuntimeArgs {
    /// Runtime to select (docker or podman); prompts when omitted
    #[arg(value_name = "RUNTIME")]
    pub runtime: Option<RuntimeKind>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
