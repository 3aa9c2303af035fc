//! Skillet Core Library
//!
//! Resolves agent skills from local paths, GitHub repositories, or a search
//! index, and installs them into the on-disk formats of AI coding tools.

pub mod auth;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod git;
pub mod github;
pub mod integration;
pub mod metadata;
pub mod registry;
pub mod skills;
pub mod source;
pub mod types;
pub mod update;

/// Re-exports of commonly used types
pub mod prelude {
    // Context and configuration
    pub use crate::config::{ConfigStore, SkilletConfig};
    pub use crate::context::{AppContext, RemoteServices};
    pub use crate::types::InstallScope;

    // Errors
    pub use crate::error::{SkillError, Suggestion};

    // Resolution
    pub use crate::source::{Chooser, NonInteractive, Selection, SourceKind, SourceSpecifier};

    // Integrations
    pub use crate::integration::{Integration, StrategyKind, TargetRequest};

    // Installation and updates
    pub use crate::metadata::{SkillMetadata, SourceType};
    pub use crate::skills::installer::{InstallReport, InstallStatus};
    pub use crate::update::{Freshness, UpdateOutcome, UpdateSummary};
}
