//! Integration targets (AI coding tools) and how skills are injected into them.
//!
//! Every integration stores the skill's files under its own skills directory
//! and then runs one of five injection strategies, chosen solely by the
//! integration:
//! - NativeCopy: the tool scans the skills directory itself
//! - ImportReference: an `@path` import appended to a shared rules file
//! - PerFileCopy: the manifest copied to a per-skill rules file
//! - AppendBlock: the manifest wrapped in markers inside a shared instructions file
//! - JsonConvert: the manifest converted to a JSON tool record

mod append_block;
mod import_reference;
mod json_convert;
mod native_copy;
mod per_file_copy;
pub mod planner;
pub mod registry;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::InstallScope;

pub use json_convert::{SkillRecord, tool_preamble};
pub use planner::{TargetPlan, TargetPlanner, TargetRequest};
pub use registry::{AdapterRegistry, SkillInjector};

/// Known integrations, in auto-detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Integration {
    ClaudeCode,
    Cursor,
    GeminiCli,
    Codex,
    OpenCode,
    Amp,
    Zed,
    Droid,
    Letta,
}

/// Used when nothing is detected.
pub const DEFAULT_INTEGRATION: Integration = Integration::ClaudeCode;

impl Integration {
    pub const ALL: [Integration; 9] = [
        Integration::ClaudeCode,
        Integration::Cursor,
        Integration::GeminiCli,
        Integration::Codex,
        Integration::OpenCode,
        Integration::Amp,
        Integration::Zed,
        Integration::Droid,
        Integration::Letta,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Integration::ClaudeCode => "claude-code",
            Integration::Cursor => "cursor",
            Integration::GeminiCli => "gemini-cli",
            Integration::Codex => "codex",
            Integration::OpenCode => "opencode",
            Integration::Amp => "amp",
            Integration::Zed => "zed",
            Integration::Droid => "droid",
            Integration::Letta => "letta",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.id() == id)
    }

    pub fn strategy(self) -> StrategyKind {
        match self {
            Integration::ClaudeCode
            | Integration::Codex
            | Integration::OpenCode
            | Integration::Droid => StrategyKind::NativeCopy,
            Integration::GeminiCli => StrategyKind::ImportReference,
            Integration::Cursor => StrategyKind::PerFileCopy,
            Integration::Amp | Integration::Zed => StrategyKind::AppendBlock,
            Integration::Letta => StrategyKind::JsonConvert,
        }
    }

    pub fn supports(self, scope: InstallScope) -> bool {
        self.skills_dir(scope).is_some()
    }

    /// Directory holding installed skills, relative to the scope root.
    pub fn skills_dir(self, scope: InstallScope) -> Option<&'static str> {
        use InstallScope::{Global, Project};
        match (self, scope) {
            (Integration::ClaudeCode, _) => Some(".claude/skills"),
            (Integration::Cursor, Project) => Some(".cursor/skills"),
            (Integration::Cursor, Global) => None,
            (Integration::GeminiCli, _) => Some(".gemini/skills"),
            (Integration::Codex, _) => Some(".codex/skills"),
            (Integration::OpenCode, Project) => Some(".opencode/skill"),
            (Integration::OpenCode, Global) => Some(".config/opencode/skill"),
            (Integration::Amp | Integration::Zed, Project) => Some(".agents/skills"),
            (Integration::Amp | Integration::Zed, Global) => None,
            (Integration::Droid, _) => Some(".factory/skills"),
            (Integration::Letta, _) => Some(".letta/skills"),
        }
    }

    /// Directory the injection strategy writes into, relative to the scope
    /// root. `None` means the skill directory itself.
    pub fn adapter_dir(self, scope: InstallScope) -> Option<&'static str> {
        match (self, scope) {
            (Integration::GeminiCli, InstallScope::Project) => Some(""),
            (Integration::GeminiCli, InstallScope::Global) => Some(".gemini"),
            (Integration::Cursor, _) => Some(".cursor/rules"),
            (Integration::Amp | Integration::Zed, _) => Some(""),
            (Integration::Letta, _) => Some(".letta/tools"),
            _ => None,
        }
    }

    /// Shared file edited by ImportReference and AppendBlock strategies.
    pub fn shared_file(self) -> Option<&'static str> {
        match self {
            Integration::GeminiCli => Some("GEMINI.md"),
            Integration::Amp | Integration::Zed => Some("AGENTS.md"),
            _ => None,
        }
    }

    /// Files or directories whose presence signals the integration is in use.
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            Integration::ClaudeCode => &[".claude", "CLAUDE.md"],
            Integration::Cursor => &[".cursor", ".cursorrules"],
            Integration::GeminiCli => &[".gemini", "GEMINI.md"],
            Integration::Codex => &[".codex"],
            Integration::OpenCode => &[".opencode", "opencode.json"],
            Integration::Amp => &[".amp"],
            Integration::Zed => &[".zed", ".rules"],
            Integration::Droid => &[".factory"],
            Integration::Letta => &[".letta"],
        }
    }
}

impl std::fmt::Display for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    NativeCopy,
    ImportReference,
    PerFileCopy,
    AppendBlock,
    JsonConvert,
}

/// Root directories the two scopes resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRoots {
    pub project_root: PathBuf,
    pub home_dir: PathBuf,
}

impl ScopeRoots {
    pub fn new(project_root: PathBuf, home_dir: PathBuf) -> Self {
        Self {
            project_root,
            home_dir,
        }
    }

    pub fn root(&self, scope: InstallScope) -> &Path {
        match scope {
            InstallScope::Project => &self.project_root,
            InstallScope::Global => &self.home_dir,
        }
    }
}

/// One place a skill gets installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub integration: Integration,
    pub scope: InstallScope,
    /// Directory receiving the skill's files
    pub install_path: PathBuf,
    /// Directory the injection strategy writes into
    pub adapter_dir: PathBuf,
}

impl InstallTarget {
    /// Compute the target for a skill. Depends only on the inputs, so
    /// reinstalling or updating the same skill always lands in the same place.
    pub fn plan(
        integration: Integration,
        scope: InstallScope,
        roots: &ScopeRoots,
        skill_name: &str,
    ) -> anyhow::Result<Self> {
        let skills_dir = integration.skills_dir(scope).ok_or_else(|| {
            anyhow::anyhow!("{} does not support {} scope", integration, scope)
        })?;
        let root = roots.root(scope);
        let install_path = root.join(skills_dir).join(skill_name);
        let adapter_dir = match integration.adapter_dir(scope) {
            Some(dir) => root.join(dir),
            None => install_path.clone(),
        };
        Ok(Self {
            integration,
            scope,
            install_path,
            adapter_dir,
        })
    }
}

/// Everything an injection strategy gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct InjectContext<'a> {
    pub integration: Integration,
    pub skill_name: &'a str,
    /// Installed skill directory (holds the manifest)
    pub source_skill_dir: &'a Path,
    pub target_dir: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The strategy wrote this file
    Written(PathBuf),
    /// Already injected; nothing written
    Unchanged,
}
