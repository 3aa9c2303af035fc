//! Repository references and local git operations.
//!
//! - Parsing URLs and `owner/repo[/subpath]` shorthands
//! - Shallow clones into temporary directories for updates

mod clone;
mod spec;

pub use clone::{TempCloneDir, head_commit, shallow_clone};
pub use spec::{MANIFEST_FILE, REPO_HOST, RepoRef, is_valid_segment};
