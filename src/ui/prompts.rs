//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use crate::error::{BerthError, Result};

use super::Prompt;

/// Convert dialoguer errors to BerthError.
fn map_dialoguer_err(e: dialoguer::Error) -> BerthError {
    BerthError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Show a select prompt on `term` and return the chosen option's value.
pub fn prompt_select(prompt: &Prompt, term: &Term) -> Result<String> {
    if prompt.options.is_empty() {
        return Err(BerthError::PromptUnavailable {
            message: format!("prompt '{}' has no options", prompt.key),
        });
    }

    let labels: Vec<_> = prompt.options.iter().map(|o| o.label.as_str()).collect();

    let selection = Select::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(prompt.default_index())
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(prompt.options[selection].value.clone())
}
