use std::path::{Path, PathBuf};

use anyhow::Context;

use super::Resolution;
use crate::error::SkillError;
use crate::fs::is_excluded_path;
use crate::git::MANIFEST_FILE;
use crate::metadata::SkillMetadata;
use crate::skills::{ResolvedSkill, SkillFile};

/// Resolves skills from the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalResolver {
    cwd: PathBuf,
    home_dir: PathBuf,
}

impl LocalResolver {
    pub fn new(cwd: PathBuf, home_dir: PathBuf) -> Self {
        Self { cwd, home_dir }
    }

    /// Absolute form of a user path, with `~` expanded.
    pub fn absolute(&self, raw: &str) -> PathBuf {
        let expanded = match raw.strip_prefix('~') {
            Some(rest) => self.home_dir.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(raw),
        };
        let joined = self.cwd.join(expanded);
        joined.canonicalize().unwrap_or(joined)
    }

    pub fn resolve(&self, raw: &str) -> Result<Resolution, SkillError> {
        let path = self.absolute(raw);
        let skill_dir = if path.is_dir() {
            path
        } else if path.file_name().is_some_and(|n| n == MANIFEST_FILE) {
            path.parent().map(Path::to_path_buf).unwrap_or(path)
        } else {
            path
        };

        if !skill_dir.join(MANIFEST_FILE).is_file() {
            return Err(SkillError::not_found(format!(
                "No {} found at {}",
                MANIFEST_FILE,
                skill_dir.display()
            )));
        }

        let skill_name = skill_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SkillError::InvalidSource(raw.to_string()))?;
        let files = read_skill_files(&skill_dir)?;

        Ok(Resolution {
            skill: ResolvedSkill::new("", "", None, skill_name, files)?,
            metadata: SkillMetadata::local(&skill_dir),
        })
    }
}

/// Every file of a skill directory, minus excluded content.
pub fn read_skill_files(dir: &Path) -> anyhow::Result<Vec<SkillFile>> {
    let mut files = Vec::new();
    collect(dir, "", &mut files)?;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

fn collect(dir: &Path, base: &str, files: &mut Vec<SkillFile>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_excluded_path(&name) {
            continue;
        }
        let relative = if base.is_empty() {
            name
        } else {
            format!("{}/{}", base, name)
        };
        let path = entry.path();
        if path.is_dir() {
            collect(&path, &relative, files)?;
        } else {
            let content = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            files.push(SkillFile::new(relative, content));
        }
    }
    Ok(())
}
