use anyhow::Context;
use std::fs;

use super::{InjectContext, InjectOutcome, SkillInjector};
use crate::git::MANIFEST_FILE;

/// Rules file extension the per-file tools look for.
const RULES_EXTENSION: &str = "mdc";

/// Copies the manifest to `<target_dir>/<skill>.mdc`, rewriting it every time.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerFileCopy;

impl SkillInjector for PerFileCopy {
    fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome> {
        let manifest_path = ctx.source_skill_dir.join(MANIFEST_FILE);
        let manifest = fs::read(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

        let rules_path = ctx
            .target_dir
            .join(format!("{}.{}", ctx.skill_name, RULES_EXTENSION));
        fs::create_dir_all(ctx.target_dir)
            .with_context(|| format!("Failed to create {}", ctx.target_dir.display()))?;
        fs::write(&rules_path, &manifest)
            .with_context(|| format!("Failed to write {}", rules_path.display()))?;
        Ok(InjectOutcome::Written(rules_path))
    }
}
