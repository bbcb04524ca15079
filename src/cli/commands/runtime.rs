//! Runtime command implementation.
//!
//! The `berth runtime` command persists which container runtime berth
//! checks and talks to.

use std::path::{Path, PathBuf};

use crate::cli::args::RuntimeArgs;
use crate::config::{default_config_path, load_config_file, save_config_file};
use crate::error::{BerthError, Result};
use crate::preflight::RuntimeKind;
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The runtime command implementation.
pub struct RuntimeCommand {
    config_path: Option<PathBuf>,
    args: RuntimeArgs,
}

impl RuntimeCommand {
    /// Create a new runtime command.
    pub fn new(config_path: Option<&Path>, args: RuntimeArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    fn resolve_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(p) => Ok(p.clone()),
            None => default_config_path(),
        }
    }

    fn choose(&self, current: RuntimeKind, ui: &mut dyn UserInterface) -> Result<RuntimeKind> {
        if let Some(kind) = self.args.runtime {
            return Ok(kind);
        }

        if !ui.is_interactive() {
            return Err(BerthError::PromptUnavailable {
                message: "No runtime given. Run `berth runtime docker` or `berth runtime podman`."
                    .to_string(),
            });
        }

        let prompt = runtime_prompt(current);
        let value = ui.select(&prompt)?;
        value.parse().map_err(|message: String| {
            BerthError::Other(anyhow::anyhow!("invalid selection: {}", message))
        })
    }
}

impl Command for RuntimeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = self.resolve_path()?;
        // Read the file itself so a BERTH_RUNTIME override is never persisted
        let mut config = load_config_file(&path)?.unwrap_or_default();
        let current = config.runtime.kind;

        let selected = self.choose(current, ui)?;
        if selected == current && path.exists() {
            ui.success(&format!("Runtime is already {}", selected.display_name()));
            return Ok(CommandResult::success());
        }

        if selected != current {
            // A custom binary belongs to the previous runtime
            config.runtime.binary = None;
        }
        config.runtime.kind = selected;
        save_config_file(&path, &config)?;

        ui.success(&format!("Runtime set to {}", selected.display_name()));
        ui.message(&format!("Saved to {}", path.display()));
        Ok(CommandResult::success())
    }
}

/// Select prompt listing every supported runtime.
pub fn runtime_prompt(current: RuntimeKind) -> Prompt {
    Prompt {
        key: "runtime".to_string(),
        question: "Which container runtime should berth use?".to_string(),
        options: RuntimeKind::ALL
            .iter()
            .map(|kind| PromptOption {
                label: kind.display_name().to_string(),
                value: kind.id().to_string(),
            })
            .collect(),
        default: Some(current.id().to_string()),
    }
}
