use anyhow::Context;
use std::fs;

use super::{InjectContext, InjectOutcome, SkillInjector};
use crate::git::MANIFEST_FILE;

/// The tool discovers skills in its skills directory. Only the manifest has
/// to be present there.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCopy;

impl SkillInjector for NativeCopy {
    fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome> {
        let dest = ctx.target_dir.join(MANIFEST_FILE);
        if dest.exists() {
            return Ok(InjectOutcome::Unchanged);
        }

        let src = ctx.source_skill_dir.join(MANIFEST_FILE);
        fs::create_dir_all(ctx.target_dir)
            .with_context(|| format!("Failed to create {}", ctx.target_dir.display()))?;
        fs::copy(&src, &dest)
            .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
        Ok(InjectOutcome::Written(dest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::Integration;
    use tempfile::TempDir;

    #[test]
    fn manifest_in_place_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "body").unwrap();
        let ctx = InjectContext {
            integration: Integration::ClaudeCode,
            skill_name: "pdf",
            source_skill_dir: tmp.path(),
            target_dir: tmp.path(),
        };
        assert_eq!(NativeCopy.inject(&ctx).unwrap(), InjectOutcome::Unchanged);
    }

    #[test]
    fn copies_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join(MANIFEST_FILE), "body").unwrap();
        let dst = tmp.path().join("dst");

        let ctx = InjectContext {
            integration: Integration::Codex,
            skill_name: "pdf",
            source_skill_dir: &src,
            target_dir: &dst,
        };
        assert_eq!(
            NativeCopy.inject(&ctx).unwrap(),
            InjectOutcome::Written(dst.join(MANIFEST_FILE))
        );
        assert_eq!(fs::read_to_string(dst.join(MANIFEST_FILE)).unwrap(), "body");
    }
}
