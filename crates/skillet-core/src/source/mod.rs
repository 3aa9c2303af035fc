//! Source resolution: from a user-supplied string to a downloaded skill.
//!
//! Local paths are read directly, `owner/repo[/subpath]` references are
//! looked up in the repository tree, and bare names go through the registry
//! pipeline.

mod direct;
mod local;
mod registry;
pub mod select;
mod spec;

pub use direct::DirectRepoResolver;
pub use local::{LocalResolver, read_skill_files};
pub use registry::RegistryResolver;
pub use select::{Chooser, NonInteractive, Selection};
pub use spec::{SourceKind, SourceSpecifier, classify};

use crate::error::SkillError;
use crate::git::RepoRef;
use crate::metadata::{SkillMetadata, SourceType};
use crate::skills::ResolvedSkill;

/// A resolved skill and the provenance to record for it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub skill: ResolvedSkill,
    pub metadata: SkillMetadata,
}

/// Dispatches a classified source to its resolver.
pub struct SourceResolver {
    local: LocalResolver,
    direct: DirectRepoResolver,
    registry: RegistryResolver,
}

impl SourceResolver {
    pub fn new(local: LocalResolver, direct: DirectRepoResolver, registry: RegistryResolver) -> Self {
        Self {
            local,
            direct,
            registry,
        }
    }

    pub async fn resolve(&self, source: &SourceSpecifier) -> Result<Resolution, SkillError> {
        match source.kind() {
            SourceKind::Local => self.local.resolve(source.raw()),
            SourceKind::DirectRepo => {
                let repo_ref = RepoRef::parse(source.raw())?;
                self.direct.resolve(&repo_ref, SourceType::Git).await
            }
            SourceKind::RegistryName => self.registry.resolve(source.raw()).await,
        }
    }
}
