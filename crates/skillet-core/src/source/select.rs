//! Interactive selection between ambiguous candidates.

use crate::error::SkillError;

/// A choice the user has to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    /// What was being resolved
    pub query: &'a str,
    pub prompt: String,
    pub items: Vec<String>,
}

/// Presents a [`Selection`]. `Ok(None)` means the user backed out.
pub trait Chooser: Send + Sync {
    fn choose(&self, selection: &Selection<'_>) -> Result<Option<usize>, SkillError>;
}

/// Never prompts: every selection is an [`SkillError::AmbiguousMatch`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl Chooser for NonInteractive {
    fn choose(&self, selection: &Selection<'_>) -> Result<Option<usize>, SkillError> {
        Err(SkillError::AmbiguousMatch {
            query: selection.query.to_string(),
            count: selection.items.len(),
        })
    }
}

/// Ask the chooser and turn a cancelled or out-of-range answer into an error.
pub(crate) fn choose_index(
    chooser: &dyn Chooser,
    selection: &Selection<'_>,
) -> Result<usize, SkillError> {
    match chooser.choose(selection)? {
        Some(index) if index < selection.items.len() => Ok(index),
        Some(index) => Err(anyhow::anyhow!("selection {} out of range", index).into()),
        None => Err(SkillError::Cancelled),
    }
}
