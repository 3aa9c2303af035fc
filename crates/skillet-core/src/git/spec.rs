//! Repository reference types.

use serde::{Deserialize, Serialize};

use crate::error::SkillError;

/// Host every repository reference points at.
pub const REPO_HOST: &str = "github.com";

/// Name of the manifest file anchoring a skill directory.
pub const MANIFEST_FILE: &str = "SKILL.md";

/// A repository on the code host, optionally narrowed to a subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit taken from a `/tree/<ref>/` URL
    pub reference: Option<String>,
    /// Directory within the repository
    pub subpath: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            reference: None,
            subpath: None,
        }
    }

    /// Set the git reference (branch, tag, or commit).
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the subdirectory path. Empty paths clear it.
    pub fn with_subpath(mut self, subpath: impl AsRef<str>) -> Self {
        self.subpath = normalize_subpath(subpath.as_ref());
        self
    }

    /// Parse a URL or shorthand into a repository reference.
    ///
    /// Supports formats:
    /// - `owner/repo`
    /// - `owner/repo/path/to/skill`
    /// - `github:owner/repo`
    /// - `github.com/owner/repo`
    /// - `https://github.com/owner/repo(.git)`
    /// - `https://github.com/owner/repo/tree/ref/path`
    /// - `git@github.com:owner/repo.git`
    pub fn parse(source: &str) -> Result<Self, SkillError> {
        let invalid = || SkillError::InvalidSource(source.to_string());
        let raw = source.trim();
        let raw = raw.strip_prefix("github:").unwrap_or(raw);

        if let Some(rest) = raw.strip_prefix("git@") {
            let (host, path) = rest.split_once(':').ok_or_else(invalid)?;
            if host != REPO_HOST {
                return Err(invalid());
            }
            return Self::from_segments(&split_segments(path)).ok_or_else(invalid);
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = url::Url::parse(raw).map_err(|_| invalid())?;
            let host = url.host_str().unwrap_or_default();
            if host != REPO_HOST && host != format!("www.{}", REPO_HOST) {
                return Err(invalid());
            }
            let segments: Vec<&str> = url
                .path_segments()
                .map(|segments| segments.filter(|s| !s.is_empty()).collect())
                .unwrap_or_default();
            return Self::from_segments(&segments).ok_or_else(invalid);
        }

        let path = raw
            .strip_prefix("www.github.com/")
            .or_else(|| raw.strip_prefix("github.com/"))
            .unwrap_or(raw);
        Self::from_segments(&split_segments(path)).ok_or_else(invalid)
    }

    /// Derive a reference from a stored repository URL.
    pub fn from_repo_url(repo_url: &str) -> Result<Self, SkillError> {
        let mut parsed = Self::parse(repo_url)?;
        parsed.subpath = None;
        Ok(parsed)
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn repo_url(&self) -> String {
        format!("https://{}/{}/{}", REPO_HOST, self.owner, self.repo)
    }

    fn from_segments(segments: &[&str]) -> Option<Self> {
        let (&owner, rest) = segments.split_first()?;
        let (&repo, rest) = rest.split_first()?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if !is_valid_segment(owner) || !is_valid_segment(repo) {
            return None;
        }

        let mut spec = Self::new(owner, repo);
        match rest {
            [] => {}
            [kind, reference, path @ ..] if *kind == "tree" || *kind == "blob" => {
                spec.reference = Some(reference.to_string());
                spec.subpath = normalize_subpath(&path.join("/"));
            }
            path => spec.subpath = normalize_subpath(&path.join("/")),
        }
        Some(spec)
    }
}

/// Whether `segment` is a plausible owner or repository name.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Trim slashes and a trailing manifest file name; empty paths become `None`.
fn normalize_subpath(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    let trimmed = if trimmed == MANIFEST_FILE {
        ""
    } else {
        trimmed
            .strip_suffix(&format!("/{}", MANIFEST_FILE))
            .unwrap_or(trimmed)
    };
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
