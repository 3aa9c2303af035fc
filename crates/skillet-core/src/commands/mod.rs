//! High-level commands. Frontends call these with an [`AppContext`].
//!
//! [`AppContext`]: crate::context::AppContext

pub mod install;
pub mod outdated;
pub mod update;

pub use install::{InstallCommand, InstallOptions, InstallOutcome};
pub use outdated::{OutdatedCommand, OutdatedOptions};
pub use update::{UpdateCommand, UpdateOptions};
