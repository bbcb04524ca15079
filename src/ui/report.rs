//! Rendering of pre-flight verdicts.

use crate::preflight::CheckResult;

use super::UserInterface;

/// The text shown to the user for a failed check: the message, a blank line,
/// then the remediation steps.
pub fn format_failure(result: &CheckResult) -> String {
    format!("{}\n\n{}", result.message(), result.suggested_action())
}

/// Show a verdict through the UI.
///
/// A pass prints one success line. A failure prints an error headline naming
/// the failure kind followed by the full explanation on the error stream.
pub fn show_check_result(ui: &mut dyn UserInterface, result: &CheckResult, runtime: &str) {
    if result.passed() {
        ui.success(&format!("{} is ready", runtime));
        return;
    }

    ui.error(&format!(
        "{} pre-flight check failed: {}",
        runtime,
        result.error_kind().label()
    ));
    ui.detail(&format_failure(result));
}
