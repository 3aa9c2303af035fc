//! Throwaway upstream repositories for update tests.

use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature};

/// Stage everything in the work tree and commit it on HEAD.
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let author = Signature::now("Skillet Test", "test@example.com").unwrap();

    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.target())
        .map(|oid| repo.find_commit(oid).unwrap());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &author, &author, message, &tree, &parents)
        .unwrap()
}

/// New repository at `path` with `files` as its first commit.
pub fn init_repo(path: &Path, files: &[(&str, &str)]) -> (Repository, Oid) {
    std::fs::create_dir_all(path).unwrap();
    let repo = Repository::init(path).unwrap();
    write_files(path, files);
    let oid = commit_all(&repo, "initial");
    (repo, oid)
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let dest = root.join(relative);
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(dest, content).unwrap();
    }
}
