//! Shared core types used across planning, installation and update.

use serde::{Deserialize, Serialize};

/// Installation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallScope {
    /// Inside the current project directory.
    Project,
    /// Inside the user's home directory.
    Global,
}

impl InstallScope {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallScope::Project => "project",
            InstallScope::Global => "global",
        }
    }
}

impl std::fmt::Display for InstallScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
