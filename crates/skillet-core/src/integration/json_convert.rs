use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

use super::{InjectContext, InjectOutcome, SkillInjector};
use crate::git::MANIFEST_FILE;
use crate::skills::manifest::Manifest;

/// JSON tool record written for tools that consume structured definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub tools: Vec<serde_json::Value>,
    pub source: String,
}

/// Text placed before every converted skill body.
pub fn tool_preamble() -> &'static str {
    "You have access to the following skill. Follow its instructions when the task matches its description.\n\n"
}

/// Converts the manifest into `<skill>.json` and keeps a raw copy beside it.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConvert;

impl SkillInjector for JsonConvert {
    fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome> {
        let manifest_path = ctx.source_skill_dir.join(MANIFEST_FILE);
        let raw = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let manifest = Manifest::parse(&raw);

        let record = SkillRecord {
            name: manifest.name().unwrap_or(ctx.skill_name).to_string(),
            description: manifest.description().unwrap_or_default().to_string(),
            instructions: format!("{}{}", tool_preamble(), manifest.body.trim()),
            tools: Vec::new(),
            source: manifest_path.to_string_lossy().into_owned(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        let json_path = ctx.target_dir.join(format!("{}.json", ctx.skill_name));
        let copy_path = ctx
            .target_dir
            .join(format!("{}.{}", ctx.skill_name, MANIFEST_FILE));

        let unchanged = fs::read_to_string(&json_path).is_ok_and(|existing| existing == json)
            && fs::read_to_string(&copy_path).is_ok_and(|existing| existing == raw);
        if unchanged {
            return Ok(InjectOutcome::Unchanged);
        }

        fs::create_dir_all(ctx.target_dir)
            .with_context(|| format!("Failed to create {}", ctx.target_dir.display()))?;
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        fs::write(&copy_path, raw)
            .with_context(|| format!("Failed to write {}", copy_path.display()))?;
        Ok(InjectOutcome::Written(json_path))
    }
}
