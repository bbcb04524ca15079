//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Select prompts answer from
//! pre-configured responses.
//!
//! # Example
//!
//! ```
//! use berth::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Checking Docker");
//! ui.error("Docker daemon is not running");
//!
//! assert!(ui.has_message("Checking Docker"));
//! assert!(ui.has_error("not running"));
//! ```

use std::collections::HashMap;

use crate::error::{BerthError, Result};

use super::{Prompt, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    errors: Vec<String>,
    details: Vec<String>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new interactive MockUI.
    pub fn new() -> Self {
        Self {
            interactive: true,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured error headlines.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured detail blocks.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if any detail block contains `text`.
    pub fn has_detail(&self, text: &str) -> bool {
        self.details.iter().any(|d| d.contains(text))
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn detail(&mut self, text: &str) {
        self.details.push(text.to_string());
    }

    fn select(&mut self, prompt: &Prompt) -> Result<String> {
        if !self.interactive {
            return Err(BerthError::PromptUnavailable {
                message: format!("'{}' needs an interactive terminal", prompt.key),
            });
        }
        self.prompts_shown.push(prompt.key.clone());

        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Ok(response.clone());
        }

        let index = prompt.default_index();
        prompt
            .options
            .get(index)
            .map(|o| o.value.clone())
            .ok_or_else(|| BerthError::PromptUnavailable {
                message: format!("prompt '{}' has no options", prompt.key),
            })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner for testing. Started spinners are recorded on [`MockUI`].
#[derive(Debug, Default)]
pub struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn finish_clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::PromptOption;

    fn prompt() -> Prompt {
        Prompt {
            key: "runtime".to_string(),
            question: "Which container runtime?".to_string(),
            options: vec![
                PromptOption {
                    label: "Docker".to_string(),
                    value: "docker".to_string(),
                },
                PromptOption {
                    label: "Podman".to_string(),
                    value: "podman".to_string(),
                },
            ],
            default: Some("docker".to_string()),
        }
    }

    #[test]
    fn captures_output() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.success("ok");
        ui.error("bad");
        ui.detail("more text");

        assert!(ui.has_message("hello"));
        assert!(ui.has_success("ok"));
        assert!(ui.has_error("bad"));
        assert!(ui.has_detail("more"));
    }

    #[test]
    fn select_uses_configured_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("runtime", "podman");
        assert_eq!(ui.select(&prompt()).unwrap(), "podman");
        assert_eq!(ui.prompts_shown(), &["runtime".to_string()]);
    }

    #[test]
    fn select_falls_back_to_default() {
        let mut ui = MockUI::new();
        assert_eq!(ui.select(&prompt()).unwrap(), "docker");
    }

    #[test]
    fn select_fails_when_not_interactive() {
        let mut ui = MockUI::new();
        ui.set_interactive(false);
        assert!(ui.select(&prompt()).is_err());
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn records_started_spinners() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Checking Docker");
        spinner.finish_clear();
        assert_eq!(ui.spinners(), &["Checking Docker".to_string()]);
    }
}
