use anyhow::Context;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::{InjectContext, InjectOutcome, SkillInjector};
use crate::git::MANIFEST_FILE;

/// Appends `@<path>` imports to the tool's rules file.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportReference;

impl SkillInjector for ImportReference {
    fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome> {
        let file_name = ctx
            .integration
            .shared_file()
            .with_context(|| format!("{} has no rules file", ctx.integration))?;
        let rules_path = ctx.target_dir.join(file_name);

        let manifest_path = ctx.source_skill_dir.join(MANIFEST_FILE);
        let import = relative_path(ctx.target_dir, &manifest_path);
        let import = import.to_string_lossy().replace('\\', "/");

        let existing = match fs::read_to_string(&rules_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", rules_path.display()));
            }
        };

        if existing.contains(import.as_str()) {
            return Ok(InjectOutcome::Unchanged);
        }

        fs::create_dir_all(ctx.target_dir)
            .with_context(|| format!("Failed to create {}", ctx.target_dir.display()))?;
        let entry = format!("\n\n# Skill: {}\n@{}\n", ctx.skill_name, import);
        fs::write(&rules_path, existing + &entry)
            .with_context(|| format!("Failed to write {}", rules_path.display()))?;
        Ok(InjectOutcome::Written(rules_path))
    }
}

/// Path of `target` as seen from directory `base`.
fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component.as_os_str());
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::Integration;
    use tempfile::TempDir;

    fn inject(root: &Path, skill: &str) -> InjectOutcome {
        let skill_dir = root.join(".gemini/skills").join(skill);
        let ctx = InjectContext {
            integration: Integration::GeminiCli,
            skill_name: skill,
            source_skill_dir: &skill_dir,
            target_dir: root,
        };
        ImportReference.inject(&ctx).unwrap()
    }

    #[test]
    fn appends_import_line() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("GEMINI.md"), "# Project rules").unwrap();

        let outcome = inject(tmp.path(), "pdf");
        assert!(matches!(outcome, InjectOutcome::Written(_)));

        let content = fs::read_to_string(tmp.path().join("GEMINI.md")).unwrap();
        assert_eq!(
            content,
            "# Project rules\n\n# Skill: pdf\n@.gemini/skills/pdf/SKILL.md\n"
        );
    }

    #[test]
    fn second_injection_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        inject(tmp.path(), "pdf");
        let first = fs::read_to_string(tmp.path().join("GEMINI.md")).unwrap();

        assert_eq!(inject(tmp.path(), "pdf"), InjectOutcome::Unchanged);
        let second = fs::read_to_string(tmp.path().join("GEMINI.md")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn relative_path_climbs_out_of_base() {
        let rel = relative_path(Path::new("/home/me/.gemini"), Path::new("/home/me/.gemini/skills/x/SKILL.md"));
        assert_eq!(rel, PathBuf::from("skills/x/SKILL.md"));

        let rel = relative_path(Path::new("/a/b"), Path::new("/a/c/SKILL.md"));
        assert_eq!(rel, PathBuf::from("../c/SKILL.md"));
    }
}
