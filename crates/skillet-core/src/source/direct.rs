use std::sync::Arc;

use tracing::{debug, info};

use super::Resolution;
use super::select::{Chooser, Selection, choose_index};
use crate::error::SkillError;
use crate::git::{MANIFEST_FILE, RepoRef};
use crate::github::RepoHost;
use crate::metadata::{SkillMetadata, SourceType};
use crate::skills::{ResolvedSkill, skill_name_for};

/// Label shown for a manifest at the repository root.
const ROOT_LABEL: &str = "(root)";

/// Resolves `owner/repo[/subpath]` against a remote tree.
#[derive(Clone)]
pub struct DirectRepoResolver {
    host: Arc<dyn RepoHost>,
    chooser: Arc<dyn Chooser>,
}

impl DirectRepoResolver {
    pub fn new(host: Arc<dyn RepoHost>, chooser: Arc<dyn Chooser>) -> Self {
        Self { host, chooser }
    }

    /// Locate the manifest directory, download it, and record provenance as
    /// `source_type`.
    pub async fn resolve(
        &self,
        repo_ref: &RepoRef,
        source_type: SourceType,
    ) -> Result<Resolution, SkillError> {
        let tree = self
            .host
            .get_tree(&repo_ref.owner, &repo_ref.repo, repo_ref.reference.as_deref())
            .await?;
        let mut candidates = matching_dirs(tree.manifest_dirs(), repo_ref.subpath.as_deref());
        if candidates.is_empty() {
            let location = match &repo_ref.subpath {
                Some(sub) => format!("{}/{}", repo_ref.slug(), sub),
                None => repo_ref.slug(),
            };
            return Err(SkillError::not_found(format!(
                "No {} found in {}",
                MANIFEST_FILE, location
            )));
        }

        let dir = if candidates.len() == 1 {
            candidates.remove(0)
        } else {
            let selection = Selection {
                query: repo_ref.subpath.as_deref().unwrap_or(&repo_ref.repo),
                prompt: format!("Multiple skills found in {}", repo_ref.slug()),
                items: candidates
                    .iter()
                    .map(|d| if d.is_empty() { ROOT_LABEL.to_string() } else { d.clone() })
                    .collect(),
            };
            let index = choose_index(self.chooser.as_ref(), &selection)?;
            candidates.remove(index)
        };

        let prefix = (!dir.is_empty()).then_some(dir.as_str());
        debug!("Downloading {} from {}@{}", dir, repo_ref.slug(), tree.branch);
        let files = self.host.download_all(&tree, prefix).await?;

        let commit = match self
            .host
            .latest_commit(&repo_ref.owner, &repo_ref.repo, Some(&tree.branch))
            .await
        {
            Ok(sha) => Some(sha),
            Err(e) => {
                debug!("No commit recorded for {}: {}", repo_ref.slug(), e);
                None
            }
        };

        let subpath = prefix.map(str::to_string);
        let skill_name = skill_name_for(&repo_ref.repo, prefix);
        let metadata = match source_type {
            SourceType::Registry => SkillMetadata::registry(repo_ref.repo_url(), subpath.clone()),
            _ => SkillMetadata::git(repo_ref.repo_url(), subpath.clone()),
        }
        .with_commit(commit);

        info!("Resolved {} to {}", skill_name, repo_ref.slug());
        Ok(Resolution {
            skill: ResolvedSkill::new(
                repo_ref.owner.clone(),
                repo_ref.repo.clone(),
                subpath,
                skill_name,
                files,
            )?,
            metadata,
        })
    }
}

/// Manifest directories matching a requested subpath, shallowest first.
///
/// An exact directory match wins outright. Otherwise directories named
/// `subpath` anywhere in the tree, or nested below it, are candidates.
fn matching_dirs(mut dirs: Vec<String>, subpath: Option<&str>) -> Vec<String> {
    if let Some(sub) = subpath {
        if dirs.iter().any(|d| d == sub) {
            return vec![sub.to_string()];
        }
        let suffix = format!("/{}", sub);
        let nested = format!("{}/", sub);
        dirs.retain(|d| d.ends_with(&suffix) || d.starts_with(&nested));
    }
    dirs.sort_by(|a, b| depth(a).cmp(&depth(b)).then_with(|| a.cmp(b)));
    dirs
}

fn depth(dir: &str) -> usize {
    if dir.is_empty() {
        0
    } else {
        dir.matches('/').count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_subpath_wins() {
        let found = matching_dirs(dirs(&["a/lint", "lint", "lint/extra"]), Some("lint"));
        assert_eq!(found, vec!["lint"]);
    }

    #[test]
    fn subpath_matches_by_name_or_parent() {
        let found = matching_dirs(dirs(&["skills/pdf", "docs/pdf", "pdf-tools", "skills/xlsx"]), Some("pdf"));
        assert_eq!(found, vec!["docs/pdf", "skills/pdf"]);

        let found = matching_dirs(dirs(&["skills/pdf", "skills/xlsx", "other/x"]), Some("skills"));
        assert_eq!(found, vec!["skills/pdf", "skills/xlsx"]);
    }

    #[test]
    fn root_sorts_first() {
        let found = matching_dirs(dirs(&["b/c", "a", ""]), None);
        assert_eq!(found, vec!["", "a", "b/c"]);
    }
}
