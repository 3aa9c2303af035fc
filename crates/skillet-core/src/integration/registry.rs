//! Mapping from integrations to their injection strategy.

use super::append_block::AppendBlock;
use super::import_reference::ImportReference;
use super::json_convert::JsonConvert;
use super::native_copy::NativeCopy;
use super::per_file_copy::PerFileCopy;
use super::{InjectContext, InjectOutcome, Integration, StrategyKind};

/// Injects an installed skill into an integration's configuration.
///
/// Each strategy defines what a repeated call does: most detect an earlier
/// injection and report `Unchanged`, `PerFileCopy` rewrites its file every time.
pub trait SkillInjector: Send + Sync {
    fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome>;
}

/// Stateless lookup from integration to strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdapterRegistry;

impl AdapterRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn injector(&self, kind: StrategyKind) -> &'static dyn SkillInjector {
        match kind {
            StrategyKind::NativeCopy => &NativeCopy,
            StrategyKind::ImportReference => &ImportReference,
            StrategyKind::PerFileCopy => &PerFileCopy,
            StrategyKind::AppendBlock => &AppendBlock,
            StrategyKind::JsonConvert => &JsonConvert,
        }
    }

    pub fn injector_for(&self, integration: Integration) -> &'static dyn SkillInjector {
        self.injector(integration.strategy())
    }

    /// Run the strategy selected by `ctx.integration`.
    pub fn inject(&self, ctx: &InjectContext<'_>) -> anyhow::Result<InjectOutcome> {
        self.injector_for(ctx.integration).inject(ctx)
    }
}
