//! Filtered directory copies.

use std::path::Path;

use anyhow::Context;

/// Directory names never carried into an installed skill.
const EXCLUDED_DIRS: [&str; 2] = ["node_modules", "__pycache__"];

/// Whether a repository-relative path is VCS, dependency or dotfile content.
pub fn is_excluded_path(relative: &str) -> bool {
    relative
        .split('/')
        .any(|segment| segment.starts_with('.') || EXCLUDED_DIRS.contains(&segment))
}

/// Copy a directory tree, overwriting existing files and skipping excluded
/// entries.
pub fn copy_tree_filtered(src: &Path, dst: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
    for entry in std::fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        if is_excluded_path(&file_name.to_string_lossy()) {
            continue;
        }
        let src_path = entry.path();
        let dst_path = dst.join(&file_name);
        if src_path.is_dir() {
            copy_tree_filtered(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }
    Ok(())
}
