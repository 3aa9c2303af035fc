//! Re-fetching installed skills from their recorded sources.
//!
//! Each skill is updated on its own: whatever goes wrong is recorded as a
//! skipped outcome and the batch moves on.

mod discovery;
mod outdated;

pub use discovery::{InstalledSkill, discover_installed};
pub use outdated::{Freshness, OutdatedReport, check_outdated};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use crate::fs::copy_tree_filtered;
use crate::git::{MANIFEST_FILE, TempCloneDir, head_commit, shallow_clone};
use crate::metadata::{MetadataStore, SkillMetadata, SourceType};

const CLONE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { commit: Option<String> },
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIssue {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub updated: usize,
    pub skipped: usize,
    pub issues: Vec<UpdateIssue>,
}

impl UpdateSummary {
    fn record(&mut self, name: &str, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::Updated { .. } => self.updated += 1,
            UpdateOutcome::Skipped(reason) => {
                self.skipped += 1;
                self.issues.push(UpdateIssue {
                    name: name.to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateEngine {
    store: MetadataStore,
    temp_root: PathBuf,
}

impl UpdateEngine {
    /// `temp_root` receives the short-lived clone directories.
    pub fn new(temp_root: PathBuf) -> Self {
        Self {
            store: MetadataStore::new(),
            temp_root,
        }
    }

    /// Update `skills` in order. Names in `missing` were requested but are
    /// not installed and are reported as skipped.
    pub async fn update_all(&self, skills: &[InstalledSkill], missing: &[String]) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        for name in missing {
            summary.record(name, &UpdateOutcome::Skipped("not installed".to_string()));
        }
        for skill in skills {
            let outcome = self.update_one(&skill.install_path).await;
            match &outcome {
                UpdateOutcome::Updated { .. } => info!("Updated {}", skill.name),
                UpdateOutcome::Skipped(reason) => warn!("Skipped {}: {}", skill.name, reason),
            }
            summary.record(&skill.name, &outcome);
        }
        summary
    }

    /// Update one installed skill directory, never failing.
    pub async fn update_one(&self, install_path: &Path) -> UpdateOutcome {
        let Some(metadata) = self.store.read(install_path) else {
            return UpdateOutcome::Skipped("no metadata".to_string());
        };
        let result = match metadata.source_type {
            SourceType::Local => self.update_local(install_path, metadata),
            SourceType::Git | SourceType::Registry => self.update_remote(install_path, metadata).await,
            SourceType::Unknown => return UpdateOutcome::Skipped("unknown source type".to_string()),
        };
        result.unwrap_or_else(|e| UpdateOutcome::Skipped(format!("{:#}", e)))
    }

    fn update_local(
        &self,
        install_path: &Path,
        metadata: SkillMetadata,
    ) -> anyhow::Result<UpdateOutcome> {
        let Some(source) = metadata.local_path.clone() else {
            return Ok(UpdateOutcome::Skipped("missing local path".to_string()));
        };
        if !source.join(MANIFEST_FILE).is_file() {
            return Ok(UpdateOutcome::Skipped(format!(
                "no {} at {}",
                MANIFEST_FILE,
                source.display()
            )));
        }

        copy_tree_filtered(&source, install_path)?;
        self.refresh(install_path, metadata, None);
        Ok(UpdateOutcome::Updated { commit: None })
    }

    async fn update_remote(
        &self,
        install_path: &Path,
        metadata: SkillMetadata,
    ) -> anyhow::Result<UpdateOutcome> {
        let Some(repo_url) = metadata.repo_url.clone() else {
            return Ok(UpdateOutcome::Skipped("missing repo URL".to_string()));
        };

        // Dropped on every exit from this function, removing the clone.
        let clone_dir = TempCloneDir::create(&self.temp_root)?;
        tokio::time::timeout(CLONE_TIMEOUT, shallow_clone(&repo_url, clone_dir.path()))
            .await
            .with_context(|| format!("git clone of {} timed out", repo_url))??;

        let source = match &metadata.subpath {
            Some(subpath) => clone_dir.path().join(subpath),
            None => clone_dir.path().to_path_buf(),
        };
        if !source.join(MANIFEST_FILE).is_file() {
            return Ok(UpdateOutcome::Skipped(format!(
                "no {} at {} in {}",
                MANIFEST_FILE,
                metadata.subpath.as_deref().unwrap_or("repository root"),
                repo_url
            )));
        }

        let commit = match head_commit(clone_dir.path()) {
            Ok(sha) => Some(sha),
            Err(e) => {
                warn!("Could not read commit of {}: {:#}", repo_url, e);
                None
            }
        };
        copy_tree_filtered(&source, install_path)?;
        self.refresh(install_path, metadata, commit.clone());
        Ok(UpdateOutcome::Updated { commit })
    }

    fn refresh(&self, install_path: &Path, metadata: SkillMetadata, commit: Option<String>) {
        if let Err(e) = self.store.write(install_path, &metadata.refreshed(commit)) {
            warn!(
                "Updated {} but could not refresh its metadata: {:#}",
                install_path.display(),
                e
            );
        }
    }
}
