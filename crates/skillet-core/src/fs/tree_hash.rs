//! Content hashing of installed skill directories.
//!
//! The installer hashes a skill directory before and after writing to it and
//! reports a target as changed only when the two differ.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::metadata::METADATA_FILE;

const FILE_TAG: u8 = 0x00;
const DIR_TAG: u8 = 0xFF;

/// Hex blake3 digest of everything under `root`.
///
/// Entries are fed in path order as `relative_path || tag`, followed by the
/// file bytes for regular files. The provenance sidecar at the root is left
/// out, so a refreshed `installedAt` alone never reads as a change.
pub fn hash_tree(root: &Path) -> anyhow::Result<String> {
    let mut hasher = blake3::Hasher::new();
    for (relative, path, is_dir) in sorted_entries(root)? {
        hasher.update(relative.as_bytes());
        if is_dir {
            hasher.update(&[DIR_TAG]);
        } else {
            hasher.update(&[FILE_TAG]);
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            hasher.update(&bytes);
        }
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Depth-first listing with siblings in byte order of their names.
fn sorted_entries(root: &Path) -> anyhow::Result<Vec<(String, PathBuf, bool)>> {
    let mut out = Vec::new();
    let mut pending = vec![(String::new(), root.to_path_buf())];

    while let Some((prefix, dir)) = pending.pop() {
        let mut children = fs::read_dir(&dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        children.sort_by_key(|entry| entry.file_name());

        let mut subdirs = Vec::new();
        for child in children {
            let name = child.file_name().to_string_lossy().into_owned();
            if prefix.is_empty() && name == METADATA_FILE {
                continue;
            }
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };
            let kind = child.file_type()?;
            if kind.is_dir() {
                out.push((relative.clone(), child.path(), true));
                subdirs.push((relative, child.path()));
            } else if kind.is_file() {
                out.push((relative, child.path(), false));
            } else {
                anyhow::bail!("Cannot hash {}: not a file or directory", child.path().display());
            }
        }
        pending.extend(subdirs.into_iter().rev());
    }

    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}
