//! User configuration for berth.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and saving in [`loader`]
//!
//! # Example
//!
//! ```
//! use berth::config::{load_config_file, save_config_file, BerthConfig};
//! use berth::preflight::RuntimeKind;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//!
//! let mut config = BerthConfig::default();
//! config.runtime.kind = RuntimeKind::Podman;
//! save_config_file(&path, &config).unwrap();
//!
//! let loaded = load_config_file(&path).unwrap().unwrap();
//! assert_eq!(loaded.runtime_profile().binary(), "podman");
//! ```
//!
//! # Configuration File Location
//!
//! 1. `--config <path>` or `BERTH_CONFIG`
//! 2. `$XDG_CONFIG_HOME/berth/config.yml`
//! 3. `~/.config/berth/config.yml`
//!
//! `BERTH_RUNTIME` overrides the runtime selected in the file.

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, default_config_path, default_config_path_with_env, load_config,
    load_config_file, parse_config, save_config_file, LoadedConfig, RUNTIME_ENV,
};
pub use schema::{BerthConfig, CheckSettings, RuntimeSettings};
