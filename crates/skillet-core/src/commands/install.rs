//! `add`: resolve a source and install it into the planned integrations.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::context::{AppContext, RemoteServices};
use crate::integration::{TargetPlan, TargetPlanner, TargetRequest};
use crate::skills::installer::InstallReport;
use crate::source::{Chooser, SourceKind, SourceSpecifier};
use crate::types::InstallScope;

#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Path, `owner/repo[/subpath]`, URL, or bare skill name
    pub source: String,
    pub targets: TargetRequest,
    pub scope: InstallScope,
}

impl InstallOptions {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            targets: TargetRequest::Auto,
            scope: InstallScope::Project,
        }
    }

    pub fn with_targets(mut self, targets: TargetRequest) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_scope(mut self, scope: InstallScope) -> Self {
        self.scope = scope;
        self
    }
}

#[derive(Debug)]
pub struct InstallOutcome {
    pub source_kind: SourceKind,
    pub plan: TargetPlan,
    pub report: InstallReport,
}

pub struct InstallCommand<'a> {
    ctx: &'a AppContext,
}

impl<'a> InstallCommand<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Classify, plan, resolve, then install. Planning happens before any
    /// network access so an invalid target fails fast.
    pub async fn run(
        &self,
        options: &InstallOptions,
        remote: &RemoteServices,
        chooser: Arc<dyn Chooser>,
    ) -> anyhow::Result<InstallOutcome> {
        let source = SourceSpecifier::parse(&options.source, self.ctx.project_root())?;

        let roots = self.ctx.scope_roots();
        let planner = TargetPlanner::new(&roots, self.ctx.default_integration()?);
        let plan = planner.plan(&options.targets, options.scope)?;

        let resolution = self
            .ctx
            .source_resolver(remote, chooser)
            .resolve(&source)
            .await?;
        info!(
            "Installing {} into {} target(s)",
            resolution.skill.skill_name,
            plan.integrations.len()
        );

        let report = self
            .ctx
            .skill_installer()
            .install(&resolution.skill, &resolution.metadata, &plan)
            .with_context(|| format!("Failed to install {}", resolution.skill.skill_name))?;

        Ok(InstallOutcome {
            source_kind: source.kind(),
            plan,
            report,
        })
    }
}
