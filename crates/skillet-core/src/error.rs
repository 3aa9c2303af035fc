//! Error taxonomy for source resolution and installation.

use std::fmt;

/// A repository suggested by the broad search phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// `owner/repo` identifier the user can re-invoke with
    pub repo: String,
    /// Path of the matching manifest, when the search knows it
    pub path: Option<String>,
    pub description: Option<String>,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({})", self.repo, path)?,
            None => write!(f, "{}", self.repo)?,
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            write!(f, " - {}", desc)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// The source string could not be classified or parsed.
    #[error("invalid source '{0}'")]
    InvalidSource(String),

    /// No manifest at the path/repo, or no search phase produced a candidate.
    #[error("{message}")]
    NotFound {
        message: String,
        suggestions: Vec<Suggestion>,
    },

    /// Several candidates match and no interactive selection is possible.
    #[error("{count} candidates match '{query}'; choose one explicitly")]
    AmbiguousMatch { query: String, count: usize },

    #[error("rate limited by {0}")]
    RateLimited(String),

    #[error("network error: {0}")]
    Network(String),

    /// The user aborted an interactive choice.
    #[error("selection cancelled")]
    Cancelled,

    /// Every planned integration target failed.
    #[error("installation failed for every target: {}", format_failures(.0))]
    InstallFailed(Vec<(String, String)>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkillError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Transient remote failures that should move the pipeline to its next fallback.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Network(_))
    }
}

impl From<reqwest::Error> for SkillError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(target, reason)| format!("{}: {}", target, reason))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = SkillError> = std::result::Result<T, E>;
