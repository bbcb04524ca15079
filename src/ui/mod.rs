//! Terminal user interface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminals (and pipes)
//! - [`MockUI`] for tests
//! - Spinners, theming, and the pre-flight failure report
//!
//! # Example
//!
//! ```
//! use berth::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("Docker is ready");
//! assert!(ui.has_success("Docker is ready"));
//! ```

pub mod mock;
pub mod output;
pub mod prompts;
pub mod report;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use output::OutputMode;
pub use prompts::prompt_select;
pub use report::{format_failure, show_check_result};
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, BerthTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display an error headline on the error stream.
    fn error(&mut self, msg: &str);

    /// Write unstyled explanatory text to the error stream.
    fn detail(&mut self, text: &str);

    /// Ask the user to pick one option, returning its value.
    fn select(&mut self, prompt: &Prompt) -> Result<String>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Remove the spinner without leaving a line behind.
    fn finish_clear(&mut self);
}

/// A select prompt.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for scripted answers in tests).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Choices, in display order.
    pub options: Vec<PromptOption>,
    /// Value preselected when the prompt opens.
    pub default: Option<String>,
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl Prompt {
    /// Index of the default option, or 0.
    pub fn default_index(&self) -> usize {
        self.default
            .as_ref()
            .and_then(|d| self.options.iter().position(|o| o.value == *d))
            .unwrap_or(0)
    }
}
