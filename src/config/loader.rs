//! Configuration file discovery, loading and saving.
//!
//! The config file lives at `$XDG_CONFIG_HOME/berth/config.yml`, falling back
//! to `~/.config/berth/config.yml`. A missing file is not an error: berth
//! runs with defaults until the user saves a runtime selection.

use crate::config::schema::BerthConfig;
use crate::error::{BerthError, Result};
use crate::preflight::RuntimeKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured runtime.
pub const RUNTIME_ENV: &str = "BERTH_RUNTIME";

const APP_DIR: &str = "berth";
const CONFIG_FILE: &str = "config.yml";

/// A configuration together with the file it belongs to.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Where the config was (or would be) read from.
    pub path: PathBuf,
    /// Parsed configuration, with environment overrides applied.
    pub config: BerthConfig,
    /// Whether the file existed.
    pub from_file: bool,
}

/// Default config path from the real environment.
pub fn default_config_path() -> Result<PathBuf> {
    default_config_path_with_env(|key: &str| std::env::var(key), dirs::home_dir())
}

/// Default config path with custom lookups.
///
/// This allows testing without modifying actual environment variables.
pub fn default_config_path_with_env<F>(env_fn: F, home: Option<PathBuf>) -> Result<PathBuf>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    if let Ok(xdg) = env_fn("XDG_CONFIG_HOME") {
        let xdg = PathBuf::from(xdg);
        // Relative XDG paths must be ignored
        if xdg.is_absolute() {
            return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
        }
    }

    home.map(|h| h.join(".config").join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| BerthError::ConfigLocation {
            message: "neither XDG_CONFIG_HOME nor a home directory is available".to_string(),
        })
}

/// Load a config file. A missing file yields the default config.
///
/// # Errors
///
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<Option<BerthConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BerthError::Io(e)),
    };

    parse_config(&content, path).map(Some)
}

/// Parse config YAML. Blank documents are treated as empty configs.
pub fn parse_config(content: &str, path: &Path) -> Result<BerthConfig> {
    if content.trim().is_empty() {
        return Ok(BerthConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| BerthError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `BERTH_RUNTIME` on top of a parsed config.
pub fn apply_env_overrides<F>(mut config: BerthConfig, env_fn: F) -> Result<BerthConfig>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    if let Ok(value) = env_fn(RUNTIME_ENV) {
        if !value.trim().is_empty() {
            let kind: RuntimeKind = value.parse().map_err(|message| BerthError::InvalidEnv {
                var: RUNTIME_ENV.to_string(),
                message,
            })?;
            tracing::debug!("{} overrides runtime to {}", RUNTIME_ENV, kind);
            if kind != config.runtime.kind {
                // A binary override belongs to the configured runtime only
                config.runtime.binary = None;
            }
            config.runtime.kind = kind;
        }
    }
    Ok(config)
}

/// Load the config from `explicit` or the default location, applying
/// environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let parsed = load_config_file(&path)?;
    let from_file = parsed.is_some();
    if from_file {
        tracing::debug!("Loaded config from {}", path.display());
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
    }

    let config = apply_env_overrides(parsed.unwrap_or_default(), |key: &str| std::env::var(key))?;

    Ok(LoadedConfig {
        path,
        config,
        from_file,
    })
}

/// Write `config` to `path`, creating parent directories.
pub fn save_config_file(path: &Path, config: &BerthConfig) -> Result<()> {
    let write_err = |message: String| BerthError::ConfigWriteError {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let yaml = serde_yaml::to_string(config).map_err(|e| write_err(e.to_string()))?;
    fs::write(path, yaml).map_err(|e| write_err(e.to_string()))?;

    tracing::info!("Saved config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;
    use tempfile::TempDir;

    fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn xdg_config_home_wins() {
        let path = default_config_path_with_env(
            env_from(&[("XDG_CONFIG_HOME", "/xdg")]),
            Some(PathBuf::from("/home/alice")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/xdg/berth/config.yml"));
    }

    #[test]
    fn relative_xdg_is_ignored() {
        let path = default_config_path_with_env(
            env_from(&[("XDG_CONFIG_HOME", "relative/dir")]),
            Some(PathBuf::from("/home/alice")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/home/alice/.config/berth/config.yml"));
    }

    #[test]
    fn no_home_and_no_xdg_is_error() {
        let result = default_config_path_with_env(env_from(&[]), None);
        assert!(matches!(result, Err(BerthError::ConfigLocation { .. })));
    }

    #[test]
    fn missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let loaded = load_config_file(&temp.path().join("config.yml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "runtime: [unterminated").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(BerthError::ConfigParseError { .. })));
    }

    #[test]
    fn blank_file_is_default() {
        let config = parse_config("\n\n", Path::new("config.yml")).unwrap();
        assert_eq!(config, BerthConfig::default());
    }

    #[test]
    fn save_then_load_keeps_selection() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("berth").join("config.yml");

        let mut config = BerthConfig::default();
        config.runtime.kind = RuntimeKind::Podman;
        config.checks.group = Some("containers".to_string());
        save_config_file(&path, &config).unwrap();

        let loaded = load_config_file(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn env_override_switches_runtime() {
        let config = apply_env_overrides(
            BerthConfig::default(),
            env_from(&[(RUNTIME_ENV, "Podman")]),
        )
        .unwrap();
        assert_eq!(config.runtime.kind, RuntimeKind::Podman);
    }

    #[test]
    fn env_override_drops_foreign_binary() {
        let mut config = BerthConfig::default();
        config.runtime.binary = Some("/usr/local/bin/docker".to_string());

        let config = apply_env_overrides(config, env_from(&[(RUNTIME_ENV, "podman")])).unwrap();
        assert!(config.runtime.binary.is_none());
    }

    #[test]
    fn invalid_env_override_is_error() {
        let result = apply_env_overrides(
            BerthConfig::default(),
            env_from(&[(RUNTIME_ENV, "containerd")]),
        );
        assert!(matches!(result, Err(BerthError::InvalidEnv { .. })));
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let config =
            apply_env_overrides(BerthConfig::default(), env_from(&[(RUNTIME_ENV, "  ")])).unwrap();
        assert_eq!(config.runtime.kind, RuntimeKind::Docker);
    }

    #[test]
    fn load_config_with_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yml");
        fs::write(&path, "checks:\n  group: docker-users\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert!(loaded.from_file);
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.checks.group.as_deref(), Some("docker-users"));
    }
}
