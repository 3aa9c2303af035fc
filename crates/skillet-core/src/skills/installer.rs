//! Skill installation across planned integration targets.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::error::SkillError;
use crate::fs::hash_tree;
use crate::integration::{
    AdapterRegistry, InjectContext, InjectOutcome, InstallTarget, Integration, ScopeRoots,
    TargetPlan,
};
use crate::metadata::{MetadataStore, SkillMetadata};
use crate::skills::ResolvedSkill;

/// Result of installing into one integration.
#[derive(Debug)]
pub struct TargetOutcome {
    pub integration: Integration,
    pub install_path: PathBuf,
    pub result: Result<TargetSuccess, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSuccess {
    /// Skill files differ from what was installed before
    pub changed: bool,
    /// File written by the injection strategy, if any
    pub injected: Option<PathBuf>,
    /// False when the sidecar could not be written; updates cannot see this install
    pub metadata_written: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    Complete,
    Partial,
    Failed,
}

#[derive(Debug)]
pub struct InstallReport {
    pub skill_name: String,
    pub outcomes: Vec<TargetOutcome>,
}

impl InstallReport {
    pub fn status(&self) -> InstallStatus {
        let failed = self.failed().count();
        if failed == 0 {
            InstallStatus::Complete
        } else if failed == self.outcomes.len() {
            InstallStatus::Failed
        } else {
            InstallStatus::Partial
        }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&TargetOutcome, &TargetSuccess)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|s| (o, s)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&TargetOutcome, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e.as_str())))
    }
}

#[derive(Debug, Clone)]
pub struct SkillInstaller {
    roots: ScopeRoots,
    adapters: AdapterRegistry,
    metadata: MetadataStore,
}

impl SkillInstaller {
    pub fn new(roots: ScopeRoots) -> Self {
        Self {
            roots,
            adapters: AdapterRegistry::new(),
            metadata: MetadataStore::new(),
        }
    }

    /// Install into every planned target, one after another.
    ///
    /// A failing target does not stop the others. Only when every target
    /// fails is the whole install an error.
    pub fn install(
        &self,
        skill: &ResolvedSkill,
        metadata: &SkillMetadata,
        plan: &TargetPlan,
    ) -> Result<InstallReport, SkillError> {
        let mut outcomes = Vec::with_capacity(plan.integrations.len());

        for &integration in &plan.integrations {
            let target = match InstallTarget::plan(
                integration,
                plan.scope,
                &self.roots,
                &skill.skill_name,
            ) {
                Ok(target) => target,
                Err(e) => {
                    outcomes.push(TargetOutcome {
                        integration,
                        install_path: PathBuf::new(),
                        result: Err(format!("{:#}", e)),
                    });
                    continue;
                }
            };

            let result = self.install_target(skill, metadata, &target);
            match &result {
                Ok(success) => info!(
                    "Installed {} for {} at {}{}",
                    skill.skill_name,
                    integration,
                    target.install_path.display(),
                    if success.changed { "" } else { " (unchanged)" }
                ),
                Err(e) => warn!("Failed to install {} for {}: {:#}", skill.skill_name, integration, e),
            }

            outcomes.push(TargetOutcome {
                integration,
                install_path: target.install_path,
                result: result.map_err(|e| format!("{:#}", e)),
            });
        }

        let report = InstallReport {
            skill_name: skill.skill_name.clone(),
            outcomes,
        };
        if !report.outcomes.is_empty() && report.status() == InstallStatus::Failed {
            let failures = report
                .failed()
                .map(|(o, e)| (o.integration.id().to_string(), e.to_string()))
                .collect();
            return Err(SkillError::InstallFailed(failures));
        }
        Ok(report)
    }

    fn install_target(
        &self,
        skill: &ResolvedSkill,
        metadata: &SkillMetadata,
        target: &InstallTarget,
    ) -> anyhow::Result<TargetSuccess> {
        let before = hash_tree(&target.install_path).ok();

        std::fs::create_dir_all(&target.install_path).with_context(|| {
            format!("Failed to create directory: {}", target.install_path.display())
        })?;
        write_files(skill, &target.install_path)?;

        let metadata_written = match self.metadata.write(&target.install_path, metadata) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Could not record provenance for {}; `update` will not see it: {:#}",
                    target.install_path.display(),
                    e
                );
                false
            }
        };

        let ctx = InjectContext {
            integration: target.integration,
            skill_name: &skill.skill_name,
            source_skill_dir: &target.install_path,
            target_dir: &target.adapter_dir,
        };
        let injected = match self.adapters.inject(&ctx)? {
            InjectOutcome::Written(path) => Some(path),
            InjectOutcome::Unchanged => None,
        };

        let after = hash_tree(&target.install_path)?;
        Ok(TargetSuccess {
            changed: before.as_deref() != Some(after.as_str()),
            injected,
            metadata_written,
        })
    }
}

fn write_files(skill: &ResolvedSkill, install_path: &Path) -> anyhow::Result<()> {
    for file in &skill.files {
        let relative = Path::new(&file.relative_path);
        if !is_contained(relative) {
            anyhow::bail!(
                "Refusing to write '{}' outside the skill directory",
                file.relative_path
            );
        }
        let dest = install_path.join(relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&dest, &file.content)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        debug!("Wrote {}", dest.display());
    }
    Ok(())
}

fn is_contained(relative: &Path) -> bool {
    relative.components().count() > 0
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::TargetRequest;
    use crate::integration::TargetPlanner;
    use crate::skills::SkillFile;
    use crate::types::InstallScope;
    use tempfile::TempDir;

    fn skill(files: Vec<SkillFile>) -> ResolvedSkill {
        ResolvedSkill::new("acme", "toolkit", Some("lint".into()), "lint", files).unwrap()
    }

    fn plan(roots: &ScopeRoots, request: TargetRequest) -> TargetPlan {
        TargetPlanner::new(roots, Integration::ClaudeCode)
            .plan(&request, InstallScope::Project)
            .unwrap()
    }

    #[test]
    fn writes_files_and_sidecar() {
        let tmp = TempDir::new().unwrap();
        let roots = ScopeRoots::new(tmp.path().to_path_buf(), tmp.path().join("home"));
        let installer = SkillInstaller::new(roots.clone());
        let skill = skill(vec![
            SkillFile::new("SKILL.md", "---\nname: lint\ndescription: d\n---\n"),
            SkillFile::new("scripts/run.sh", "echo hi"),
        ]);
        let metadata = SkillMetadata::git("https://github.com/acme/toolkit", Some("lint".into()));

        let report = installer
            .install(&skill, &metadata, &plan(&roots, TargetRequest::Auto))
            .unwrap();
        assert_eq!(report.status(), InstallStatus::Complete);

        let dir = tmp.path().join(".claude/skills/lint");
        assert!(dir.join("SKILL.md").is_file());
        assert_eq!(std::fs::read_to_string(dir.join("scripts/run.sh")).unwrap(), "echo hi");
        assert_eq!(MetadataStore::new().read(&dir).unwrap().repo_url, metadata.repo_url);

        let (_, success) = report.succeeded().next().unwrap();
        assert!(success.changed);
        assert!(success.metadata_written);
    }

    #[test]
    fn reinstall_of_same_content_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let roots = ScopeRoots::new(tmp.path().to_path_buf(), tmp.path().join("home"));
        let installer = SkillInstaller::new(roots.clone());
        let skill = skill(vec![SkillFile::new("SKILL.md", "body")]);
        let metadata = SkillMetadata::local(tmp.path().join("src"));
        let plan = plan(&roots, TargetRequest::Auto);

        installer.install(&skill, &metadata, &plan).unwrap();
        let report = installer.install(&skill, &metadata, &plan).unwrap();
        let (_, success) = report.succeeded().next().unwrap();
        assert!(!success.changed);
    }

    #[test]
    fn rejects_paths_escaping_the_skill_directory() {
        assert!(!is_contained(Path::new("../evil")));
        assert!(!is_contained(Path::new("/etc/passwd")));
        assert!(!is_contained(Path::new("")));
        assert!(is_contained(Path::new("scripts/run.sh")));
    }

    #[test]
    fn escaping_file_fails_the_target() {
        let tmp = TempDir::new().unwrap();
        let roots = ScopeRoots::new(tmp.path().to_path_buf(), tmp.path().join("home"));
        let installer = SkillInstaller::new(roots.clone());
        let skill = skill(vec![
            SkillFile::new("SKILL.md", "body"),
            SkillFile::new("../outside.txt", "x"),
        ]);
        let metadata = SkillMetadata::local(tmp.path());

        let err = installer
            .install(&skill, &metadata, &plan(&roots, TargetRequest::Auto))
            .unwrap_err();
        assert!(matches!(err, SkillError::InstallFailed(ref f) if f.len() == 1));
        assert!(!tmp.path().join(".claude/skills/outside.txt").exists());
    }
}
