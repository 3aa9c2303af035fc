//! Enumerating installed skills for a scope.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::git::MANIFEST_FILE;
use crate::integration::{Integration, ScopeRoots};
use crate::metadata::{METADATA_FILE, MetadataStore, SkillMetadata};
use crate::types::InstallScope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledSkill {
    pub name: String,
    pub install_path: PathBuf,
    /// Integrations reading this directory (several share `.agents/skills`)
    pub integrations: Vec<Integration>,
    /// `None` when the sidecar is missing or unreadable
    pub metadata: Option<SkillMetadata>,
}

/// Every skill directory under the integrations' skills directories for
/// `scope`. A directory counts when it holds a manifest or a sidecar.
/// Results are sorted by name, then path.
pub fn discover_installed(
    roots: &ScopeRoots,
    scope: InstallScope,
    store: &MetadataStore,
) -> Vec<InstalledSkill> {
    let mut found: BTreeMap<PathBuf, InstalledSkill> = BTreeMap::new();
    let root = roots.root(scope);

    for integration in Integration::ALL {
        let Some(skills_dir) = integration.skills_dir(scope) else {
            continue;
        };
        let Ok(entries) = std::fs::read_dir(root.join(skills_dir)) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir()
                || !(path.join(MANIFEST_FILE).is_file() || path.join(METADATA_FILE).is_file())
            {
                continue;
            }
            found
                .entry(path.clone())
                .and_modify(|skill| skill.integrations.push(integration))
                .or_insert_with(|| InstalledSkill {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    metadata: store.read(&path),
                    install_path: path,
                    integrations: vec![integration],
                });
        }
    }

    let mut skills: Vec<InstalledSkill> = found.into_values().collect();
    skills.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.install_path.cmp(&b.install_path)));
    skills
}
