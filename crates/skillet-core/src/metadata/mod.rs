//! Provenance sidecar stored next to every installed skill.
//!
//! The sidecar is a flat JSON object (`.skillet.json`) recording where the
//! skill came from, so `update` and `outdated` can repeat the resolution
//! later. A missing or unreadable sidecar is a normal state, not an error.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the sidecar inside an installed skill directory.
pub const METADATA_FILE: &str = ".skillet.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Local,
    Git,
    Registry,
    /// Written by a newer or foreign tool
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMetadata {
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    pub installed_at: DateTime<Utc>,
}

impl SkillMetadata {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            source_type: SourceType::Local,
            repo_url: None,
            subpath: None,
            local_path: Some(path.into()),
            commit_hash: None,
            installed_at: Utc::now(),
        }
    }

    pub fn git(repo_url: impl Into<String>, subpath: Option<String>) -> Self {
        Self {
            source_type: SourceType::Git,
            repo_url: Some(repo_url.into()),
            subpath,
            local_path: None,
            commit_hash: None,
            installed_at: Utc::now(),
        }
    }

    pub fn registry(repo_url: impl Into<String>, subpath: Option<String>) -> Self {
        Self {
            source_type: SourceType::Registry,
            ..Self::git(repo_url, subpath)
        }
    }

    pub fn with_commit(mut self, commit_hash: Option<String>) -> Self {
        self.commit_hash = commit_hash;
        self
    }

    /// Same provenance with a fresh `installedAt`.
    pub fn refreshed(mut self, commit_hash: Option<String>) -> Self {
        self.installed_at = Utc::now();
        if commit_hash.is_some() {
            self.commit_hash = commit_hash;
        }
        self
    }
}

/// Reads and writes sidecars.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataStore;

impl MetadataStore {
    pub fn new() -> Self {
        Self
    }

    pub fn path_for(install_path: &Path) -> PathBuf {
        install_path.join(METADATA_FILE)
    }

    /// Write the sidecar, replacing any previous one.
    pub fn write(&self, install_path: &Path, metadata: &SkillMetadata) -> anyhow::Result<()> {
        let path = Self::path_for(install_path);
        let content =
            serde_json::to_string_pretty(metadata).context("Failed to serialize skill metadata")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write metadata: {}", path.display()))?;
        Ok(())
    }

    /// Parsed sidecar, or `None` when absent or unparsable.
    pub fn read(&self, install_path: &Path) -> Option<SkillMetadata> {
        let path = Self::path_for(install_path);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "ignoring unreadable metadata");
                None
            }
        }
    }
}
