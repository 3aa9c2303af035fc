//! Skills: resolved file sets, manifests, and installation.

pub mod installer;
pub mod manifest;

use tracing::warn;

use crate::error::SkillError;
use crate::git::MANIFEST_FILE;
use manifest::Manifest;

/// One file of a skill, relative to the skill directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillFile {
    pub relative_path: String,
    pub content: Vec<u8>,
}

impl SkillFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

/// A skill located and downloaded, ready to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSkill {
    /// Repository owner (empty for local sources)
    pub owner: String,
    /// Repository name (empty for local sources)
    pub repo: String,
    /// Directory of the manifest within the repository; `None` at the root
    pub subpath: Option<String>,
    pub skill_name: String,
    pub files: Vec<SkillFile>,
}

impl ResolvedSkill {
    /// Build a resolved skill, checking that exactly one root manifest is present.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        subpath: Option<String>,
        skill_name: impl Into<String>,
        files: Vec<SkillFile>,
    ) -> Result<Self, SkillError> {
        let skill_name = skill_name.into();
        let manifests = files
            .iter()
            .filter(|f| f.relative_path == MANIFEST_FILE)
            .count();
        if manifests != 1 {
            return Err(SkillError::not_found(format!(
                "Skill '{}' has no {} among its files",
                skill_name, MANIFEST_FILE
            )));
        }
        if !is_safe_skill_name(&skill_name) {
            return Err(SkillError::InvalidSource(skill_name));
        }
        let skill = Self {
            owner: owner.into(),
            repo: repo.into(),
            subpath,
            skill_name,
            files,
        };
        if let Some(manifest) = skill.manifest() {
            let parsed = Manifest::parse(&String::from_utf8_lossy(&manifest.content));
            if let Err(e) = parsed.validate() {
                warn!("{}: {}", skill.skill_name, e);
            }
        }
        Ok(skill)
    }

    pub fn manifest(&self) -> Option<&SkillFile> {
        self.files.iter().find(|f| f.relative_path == MANIFEST_FILE)
    }
}

/// Skill name for a manifest directory: its base name, or the repository
/// name when the manifest sits at the repository root.
pub fn skill_name_for(repo: &str, subpath: Option<&str>) -> String {
    subpath
        .and_then(|p| p.rsplit('/').find(|s| !s.is_empty()))
        .unwrap_or(repo)
        .to_string()
}

fn is_safe_skill_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_name_from_nested_directory() {
        assert_eq!(skill_name_for("toolkit", Some("skills/lint")), "lint");
    }

    #[test]
    fn skill_name_from_repo_root() {
        assert_eq!(skill_name_for("toolkit", None), "toolkit");
    }

    #[test]
    fn resolved_skill_requires_root_manifest() {
        let files = vec![SkillFile::new("docs/SKILL.md", "x")];
        assert!(ResolvedSkill::new("acme", "toolkit", None, "toolkit", files).is_err());
    }

    #[test]
    fn resolved_skill_rejects_path_like_names() {
        let files = vec![SkillFile::new("SKILL.md", "x")];
        assert!(ResolvedSkill::new("", "", None, "..", files).is_err());
    }
}
