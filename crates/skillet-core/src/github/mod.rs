//! GitHub access: repository trees, raw file content, and search.

mod fetcher;
mod search;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::error::SkillError;
use crate::fs::is_excluded_path;
use crate::git::MANIFEST_FILE;
use crate::skills::SkillFile;

pub use fetcher::{ArtifactFetcher, DEFAULT_API_BASE, DEFAULT_RAW_BASE};
pub use search::{BroadSearch, GitHubSearch, MAX_SUGGESTIONS};

const USER_AGENT: &str = concat!("skillet/", env!("CARGO_PKG_VERSION"));

/// Branch names tried, in order, when none is requested or the requested
/// conventional one is missing.
pub const CONVENTIONAL_BRANCHES: [&str; 2] = ["main", "master"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
        }
    }
}

/// Full recursive listing of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTree {
    pub owner: String,
    pub repo: String,
    /// Branch the listing actually came from
    pub branch: String,
    pub entries: Vec<TreeEntry>,
}

impl RepoTree {
    /// Directories (repository-relative, `""` for the root) that hold a manifest.
    pub fn manifest_dirs(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Blob)
            .filter_map(|e| {
                if e.path == MANIFEST_FILE {
                    Some(String::new())
                } else {
                    e.path
                        .strip_suffix(MANIFEST_FILE)
                        .and_then(|dir| dir.strip_suffix('/'))
                        .map(str::to_string)
                }
            })
            .collect()
    }

    /// Blob paths under `prefix` (all blobs when `None`), minus excluded content.
    /// Returned as `(repository path, path relative to prefix)`.
    pub fn files_under<'a>(&'a self, prefix: Option<&'a str>) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Blob)
            .filter_map(move |e| {
                let relative = match prefix.filter(|p| !p.is_empty()) {
                    Some(p) => e.path.strip_prefix(p)?.strip_prefix('/')?,
                    None => e.path.as_str(),
                };
                (!is_excluded_path(relative)).then_some((e.path.as_str(), relative))
            })
    }
}

/// A remote code host.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Recursive tree listing. With no branch (or a conventional one), the
    /// other conventional branch is tried once before the error propagates.
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<RepoTree, SkillError>;

    /// Raw content of one file, with the same branch fallback.
    async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Vec<u8>, SkillError>;

    /// Raw content of one file on exactly `branch`, with no fallback.
    async fn fetch_raw_at(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<u8>, SkillError>;

    /// Head commit of a branch.
    async fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<String, SkillError>;

    /// Fetch every file under `prefix` in an already listed tree, with the
    /// prefix stripped from the result paths. Every file comes from the branch
    /// the tree was listed on. Files that fail to fetch are dropped with a
    /// warning.
    async fn download_all(
        &self,
        tree: &RepoTree,
        prefix: Option<&str>,
    ) -> Result<Vec<SkillFile>, SkillError> {
        let mut files = Vec::new();
        for (path, relative) in tree.files_under(prefix) {
            match self
                .fetch_raw_at(&tree.owner, &tree.repo, path, &tree.branch)
                .await
            {
                Ok(content) => files.push(SkillFile::new(relative, content)),
                Err(e) => warn!("Skipping {}/{}:{}: {}", tree.owner, tree.repo, path, e),
            }
        }
        Ok(files)
    }
}

/// Branches to try for a request, in order.
pub(crate) fn branch_candidates(requested: Option<&str>) -> Vec<&str> {
    match requested {
        None => CONVENTIONAL_BRANCHES.to_vec(),
        Some(branch) if CONVENTIONAL_BRANCHES.contains(&branch) => {
            let mut branches = vec![branch];
            branches.extend(CONVENTIONAL_BRANCHES.iter().filter(|b| **b != branch));
            branches
        }
        Some(branch) => vec![branch],
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client, SkillError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(1))
        .build()
        .map_err(|e| SkillError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success response to the error taxonomy.
pub(crate) fn status_error(response: &reqwest::Response, what: &str) -> SkillError {
    let status = response.status();
    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0");

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || (status == reqwest::StatusCode::FORBIDDEN && exhausted)
    {
        SkillError::RateLimited(format!("{} (HTTP {})", what, status.as_u16()))
    } else if status == reqwest::StatusCode::NOT_FOUND {
        SkillError::not_found(format!("{} not found", what))
    } else {
        SkillError::Network(format!("{}: HTTP {}", what, status))
    }
}
