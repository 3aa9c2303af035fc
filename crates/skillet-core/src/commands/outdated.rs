//! `outdated`: compare installed commits with upstream.

use crate::context::{AppContext, RemoteServices};
use crate::metadata::MetadataStore;
use crate::types::InstallScope;
use crate::update::{OutdatedReport, check_outdated, discover_installed};

#[derive(Debug, Clone)]
pub struct OutdatedOptions {
    pub scope: InstallScope,
}

pub struct OutdatedCommand<'a> {
    ctx: &'a AppContext,
}

impl<'a> OutdatedCommand<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, options: &OutdatedOptions, remote: &RemoteServices) -> Vec<OutdatedReport> {
        let roots = self.ctx.scope_roots();
        let installed = discover_installed(&roots, options.scope, &MetadataStore::new());
        check_outdated(remote.host.as_ref(), &installed).await
    }
}
