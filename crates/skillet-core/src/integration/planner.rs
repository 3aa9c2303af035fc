//! Choosing which integrations receive an install.

use tracing::{debug, warn};

use super::{Integration, ScopeRoots};
use crate::error::SkillError;
use crate::types::InstallScope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRequest {
    /// One integration by id
    Explicit(String),
    /// Every integration that supports the scope
    All,
    /// Detect from marker files, falling back to the default
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlan {
    pub scope: InstallScope,
    pub integrations: Vec<Integration>,
    /// Integrations skipped because they do not support the scope
    pub skipped: Vec<Integration>,
    /// True when auto-detection found nothing and the default was used
    pub defaulted: bool,
}

pub struct TargetPlanner<'a> {
    roots: &'a ScopeRoots,
    default: Integration,
}

impl<'a> TargetPlanner<'a> {
    pub fn new(roots: &'a ScopeRoots, default: Integration) -> Self {
        Self { roots, default }
    }

    pub fn plan(
        &self,
        request: &TargetRequest,
        scope: InstallScope,
    ) -> Result<TargetPlan, SkillError> {
        let mut plan = TargetPlan {
            scope,
            integrations: Vec::new(),
            skipped: Vec::new(),
            defaulted: false,
        };

        match request {
            TargetRequest::Explicit(id) => {
                let integration = Integration::from_id(id).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown integration '{}'. Known integrations: {}",
                        id,
                        known_ids()
                    )
                })?;
                ensure_supported(integration, scope)?;
                plan.integrations.push(integration);
            }
            TargetRequest::All => {
                for integration in Integration::ALL {
                    if integration.supports(scope) {
                        plan.integrations.push(integration);
                    } else {
                        warn!("Skipping {}: no {} scope support", integration, scope);
                        plan.skipped.push(integration);
                    }
                }
            }
            TargetRequest::Auto => match self.detect(scope) {
                Some(integration) => {
                    debug!("Detected integration {}", integration);
                    plan.integrations.push(integration);
                }
                None => {
                    ensure_supported(self.default, scope)?;
                    debug!("No integration detected; using {}", self.default);
                    plan.integrations.push(self.default);
                    plan.defaulted = true;
                }
            },
        }

        Ok(plan)
    }

    /// First integration, in priority order, whose marker exists under the
    /// scope root.
    pub fn detect(&self, scope: InstallScope) -> Option<Integration> {
        let root = self.roots.root(scope);
        Integration::ALL.into_iter().find(|integration| {
            integration.supports(scope)
                && integration
                    .markers()
                    .iter()
                    .any(|marker| root.join(marker).exists())
        })
    }
}

fn ensure_supported(integration: Integration, scope: InstallScope) -> Result<(), SkillError> {
    if integration.supports(scope) {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} does not support {} scope", integration, scope).into())
    }
}

fn known_ids() -> String {
    Integration::ALL
        .iter()
        .map(|i| i.id())
        .collect::<Vec<_>>()
        .join(", ")
}
