//! Check command implementation.
//!
//! The `berth check` command runs the pre-flight pipeline against the host
//! and reports the verdict. It is also what a bare `berth` runs.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::config::{load_config, BerthConfig};
use crate::error::{BerthError, Result};
use crate::preflight::{CheckResult, HostSystem, Platform, ReadinessChecker, SystemQuery};
use crate::ui::{show_check_result, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(config_path: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run the checks against `system` and report through `ui`.
    pub fn run(
        &self,
        system: &dyn SystemQuery,
        platform: Platform,
        config: &BerthConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let checker = ReadinessChecker::new(system, platform, config.runtime_profile());
        let runtime = checker.profile().display_name();

        let result = if self.args.json {
            checker.run_pre_checks()
        } else {
            let mut spinner = ui.start_spinner(&format!("Checking {}...", runtime));
            let result = checker.run_pre_checks();
            spinner.finish_clear();
            result
        };

        if self.args.json {
            println!("{}", render_json(&result)?);
        } else {
            show_check_result(ui, &result, runtime);
        }

        if result.passed() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = load_config(self.config_path.as_deref())?;
        let system = HostSystem::new().with_group_file(loaded.config.group_file());
        tracing::debug!(
            "Checking {} (group file {})",
            loaded.config.runtime.kind,
            system.group_file().display()
        );
        self.run(&system, Platform::current(), &loaded.config, ui)
    }
}

/// Serialize a verdict for `--json`.
pub fn render_json(result: &CheckResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| BerthError::Other(e.into()))
}
