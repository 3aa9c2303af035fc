//! Classification of raw source strings.

use std::path::Path;

use crate::error::SkillError;
use crate::git::{REPO_HOST, is_valid_segment};

/// Markers that make a string a repository reference regardless of shape.
const HOST_MARKERS: [&str; 4] = [REPO_HOST, "git@", "://", "github:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A path on the local filesystem
    Local,
    /// `owner/repo[/subpath]` or a repository URL
    DirectRepo,
    /// A bare skill name looked up through search
    RegistryName,
}

/// A user-supplied source string together with its derived kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpecifier {
    raw: String,
    kind: SourceKind,
}

impl SourceSpecifier {
    /// Classify `raw`, resolving relative paths against `cwd`.
    pub fn parse(raw: &str, cwd: &Path) -> Result<Self, SkillError> {
        let raw = raw.trim();
        let kind = classify(raw, cwd)?;
        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

/// Local paths win over everything, so `./owner/repo` is never read as a
/// repository.
pub fn classify(raw: &str, cwd: &Path) -> Result<SourceKind, SkillError> {
    if raw.is_empty() {
        return Err(SkillError::InvalidSource(raw.to_string()));
    }

    if raw.starts_with(['.', '~', '/', '\\']) || cwd.join(raw).exists() {
        return Ok(SourceKind::Local);
    }

    if HOST_MARKERS.iter().any(|marker| raw.contains(marker)) || is_repo_shorthand(raw) {
        return Ok(SourceKind::DirectRepo);
    }

    if raw.contains('/') || !is_valid_segment(raw) {
        return Err(SkillError::InvalidSource(raw.to_string()));
    }
    Ok(SourceKind::RegistryName)
}

/// `owner/repo` optionally followed by a subpath.
fn is_repo_shorthand(raw: &str) -> bool {
    let mut segments = raw.split('/');
    let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
        return false;
    };
    !owner.starts_with('.')
        && !owner.contains(':')
        && is_valid_segment(owner)
        && is_valid_segment(repo)
        && segments.all(|s| !s.is_empty())
}
