//! Interactive selection for ambiguous sources.
//!
//! Uses dialoguer for terminal prompts. Without a terminal, selections fall
//! back to the non-interactive behaviour.

use console::Term;
use dialoguer::{Select, theme::ColorfulTheme};

use skillet_core::error::SkillError;
use skillet_core::source::{Chooser, NonInteractive, Selection};

/// Prompts on stderr with an arrow-key list. Escape cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerChooser;

impl Chooser for DialoguerChooser {
    fn choose(&self, selection: &Selection<'_>) -> Result<Option<usize>, SkillError> {
        if !Term::stderr().is_term() {
            return NonInteractive.choose(selection);
        }

        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(&selection.prompt)
            .items(&selection.items)
            .default(0)
            .interact_opt()
            .map_err(|e| SkillError::Other(anyhow::Error::new(e).context("Selection prompt failed")))
    }
}
