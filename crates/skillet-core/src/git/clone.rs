//! Shallow clones into self-removing temporary directories.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Context;

const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

static CLONE_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Temporary clone directory, removed when dropped.
#[derive(Debug)]
pub struct TempCloneDir {
    path: PathBuf,
}

impl TempCloneDir {
    /// Create a uniquely named, empty directory under `base`.
    ///
    /// The name combines a timestamp, the process id and a per-process
    /// sequence number, so concurrent invocations on one machine never share
    /// a directory. `git clone` accepts the empty directory as destination.
    pub fn create(base: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(base)
            .with_context(|| format!("Failed to create temp directory: {}", base.display()))?;

        let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S%f");
        for _ in 0..100 {
            let seq = CLONE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
            let name = format!("skillet-clone-{}-{}-{}", stamp, std::process::id(), seq);
            let candidate = base.join(name);
            match std::fs::create_dir(&candidate) {
                Ok(()) => return Ok(Self { path: candidate }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to create {}", candidate.display())
                    });
                }
            }
        }
        anyhow::bail!(
            "Failed to allocate a temp clone directory in {}",
            base.display()
        );
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempCloneDir {
    fn drop(&mut self) {
        if self.path.exists()
            && let Err(err) = std::fs::remove_dir_all(&self.path)
        {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to remove temp clone");
        }
    }
}

/// `git clone --depth 1 <repo_url> <dest>`
pub async fn shallow_clone(repo_url: &str, dest: &Path) -> anyhow::Result<()> {
    let mut cmd = tokio::process::Command::new("git");
    for key in GIT_ENV_OVERRIDES {
        cmd.env_remove(key);
    }
    cmd.args(["clone", "--depth", "1", "--quiet", repo_url])
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = cmd
        .output()
        .await
        .with_context(|| format!("Failed to run git clone for {}", repo_url))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git clone of {} failed: {}", repo_url, stderr.trim());
    }
    Ok(())
}

/// Commit SHA checked out at `repo_path`.
pub fn head_commit(repo_path: &Path) -> anyhow::Result<String> {
    let repo = git2::Repository::open(repo_path)
        .with_context(|| format!("Failed to open repository: {}", repo_path.display()))?;
    let commit = repo.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}
