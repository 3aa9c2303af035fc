//! `update`: refresh installed skills from their recorded sources.

use crate::context::AppContext;
use crate::metadata::MetadataStore;
use crate::types::InstallScope;
use crate::update::{UpdateSummary, discover_installed};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Skills to update; empty means all installed skills
    pub names: Vec<String>,
    pub scope: InstallScope,
}

pub struct UpdateCommand<'a> {
    ctx: &'a AppContext,
}

impl<'a> UpdateCommand<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, options: &UpdateOptions) -> UpdateSummary {
        let roots = self.ctx.scope_roots();
        let mut installed = discover_installed(&roots, options.scope, &MetadataStore::new());

        let mut missing = Vec::new();
        if !options.names.is_empty() {
            installed.retain(|skill| options.names.contains(&skill.name));
            missing = options
                .names
                .iter()
                .filter(|name| !installed.iter().any(|skill| &skill.name == *name))
                .cloned()
                .collect();
        }

        self.ctx.update_engine().update_all(&installed, &missing).await
    }
}
