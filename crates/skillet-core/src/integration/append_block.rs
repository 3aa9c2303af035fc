use anyhow::Context;
use std::fs;

use super::{InjectContext, InjectOutcome, SkillInjector};
use crate::git::MANIFEST_FILE;

const END_MARKER: &str = "<!-- End Skill -->";

fn start_marker(skill_name: &str) -> String {
    format!("<!-- Skill: {} -->", skill_name)
}

/// Appends the manifest, wrapped in markers, to a shared instructions file.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppendBlock;

impl SkillInjector for AppendBlock {
    fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome> {
        let file_name = ctx
            .integration
            .shared_file()
            .with_context(|| format!("{} has no shared instructions file", ctx.integration))?;
        let shared_path = ctx.target_dir.join(file_name);

        let existing = match fs::read_to_string(&shared_path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", shared_path.display()));
            }
        };

        let marker = start_marker(ctx.skill_name);
        if let Some(content) = &existing
            && content.lines().any(|line| line.trim() == marker)
        {
            return Ok(InjectOutcome::Unchanged);
        }

        let manifest_path = ctx.source_skill_dir.join(MANIFEST_FILE);
        let manifest = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

        let mut content = existing.unwrap_or_else(|| "# Agent Instructions".to_string());
        content.push_str(&format!(
            "\n\n{}\n{}\n{}\n",
            marker,
            manifest,
            END_MARKER
        ));

        fs::create_dir_all(ctx.target_dir)
            .with_context(|| format!("Failed to create {}", ctx.target_dir.display()))?;
        fs::write(&shared_path, content)
            .with_context(|| format!("Failed to write {}", shared_path.display()))?;
        Ok(InjectOutcome::Written(shared_path))
    }
}
