//! Terminal UI.

use console::Term;
use std::io::{IsTerminal, Write};

use crate::error::{BerthError, Result};

use super::{
    prompt_select, should_use_colors, BerthTheme, OutputMode, ProgressSpinner, Prompt,
    SpinnerHandle, UserInterface,
};

/// Terminal UI implementation.
///
/// Status lines go to stdout, errors and remedies to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: BerthTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors {
            BerthTheme::new()
        } else {
            BerthTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn detail(&mut self, text: &str) {
        writeln!(self.err, "{}", self.theme.format_remedy(text)).ok();
    }

    fn select(&mut self, prompt: &Prompt) -> Result<String> {
        if !self.is_interactive() {
            return Err(BerthError::PromptUnavailable {
                message: format!("'{}' needs an interactive terminal", prompt.key),
            });
        }
        prompt_select(prompt, &self.err)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() && self.err.is_term() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn is_interactive(&self) -> bool {
        self.err.is_term() && std::io::stdin().is_terminal()
    }
}

/// Create the terminal UI for the given flags.
pub fn create_ui(quiet: bool, no_color: bool) -> TerminalUI {
    let mode = if quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    TerminalUI::new(mode, !no_color && should_use_colors())
}
