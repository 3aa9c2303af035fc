//! In-memory stand-ins for the remote seams.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use skillet_core::error::{SkillError, Suggestion};
use skillet_core::github::{BroadSearch, RepoHost, RepoTree, TreeEntry};
use skillet_core::registry::{SearchHit, SkillIndex};
use skillet_core::source::{Chooser, Selection};

/// Repositories keyed by `owner/repo`, each a map of path to content.
#[derive(Default)]
pub struct FakeHost {
    repos: HashMap<String, HashMap<String, Vec<u8>>>,
    commits: HashMap<String, String>,
    failing: HashMap<String, fn() -> SkillError>,
    pub tree_calls: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, slug: &str, files: &[(&str, &str)]) -> Self {
        self.repos.insert(
            slug.to_string(),
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec()))
                .collect(),
        );
        self
    }

    pub fn with_commit(mut self, slug: &str, sha: &str) -> Self {
        self.commits.insert(slug.to_string(), sha.to_string());
        self
    }

    /// Every call for `slug` fails with the error `make` builds.
    pub fn failing(mut self, slug: &str, make: fn() -> SkillError) -> Self {
        self.failing.insert(slug.to_string(), make);
        self
    }

    fn check(&self, owner: &str, repo: &str) -> Result<&HashMap<String, Vec<u8>>, SkillError> {
        let slug = format!("{owner}/{repo}");
        if let Some(make) = self.failing.get(&slug) {
            return Err(make());
        }
        self.repos
            .get(&slug)
            .ok_or_else(|| SkillError::not_found(format!("{slug} not found")))
    }
}

#[async_trait]
impl RepoHost for FakeHost {
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<RepoTree, SkillError> {
        self.tree_calls.fetch_add(1, Ordering::SeqCst);
        let files = self.check(owner, repo)?;
        let mut entries: Vec<TreeEntry> = files.keys().map(|p| TreeEntry::blob(p.as_str())).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(RepoTree {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.unwrap_or("main").to_string(),
            entries,
        })
    }

    async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        _branch: Option<&str>,
    ) -> Result<Vec<u8>, SkillError> {
        self.check(owner, repo)?
            .get(path)
            .cloned()
            .ok_or_else(|| SkillError::not_found(path.to_string()))
    }

    async fn fetch_raw_at(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<u8>, SkillError> {
        self.fetch_raw(owner, repo, path, Some(branch)).await
    }

    async fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
        _branch: Option<&str>,
    ) -> Result<String, SkillError> {
        let slug = format!("{owner}/{repo}");
        self.commits
            .get(&slug)
            .cloned()
            .ok_or_else(|| SkillError::Network(format!("no commit for {slug}")))
    }
}

pub struct FakeIndex {
    result: Result<Vec<SearchHit>, fn() -> SkillError>,
}

impl FakeIndex {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self { result: Ok(hits) }
    }

    pub fn empty() -> Self {
        Self::with_hits(Vec::new())
    }

    pub fn failing(make: fn() -> SkillError) -> Self {
        Self { result: Err(make) }
    }
}

#[async_trait]
impl SkillIndex for FakeIndex {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SkillError> {
        match &self.result {
            Ok(hits) => Ok(hits.clone()),
            Err(make) => Err(make()),
        }
    }
}

pub fn hit(name: &str, owner: &str, repo: &str, path: Option<&str>, popularity: u64) -> SearchHit {
    SearchHit {
        id: format!("{owner}/{repo}/{}", path.unwrap_or_default()),
        name: name.to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
        path: path.map(str::to_string),
        description: None,
        popularity,
    }
}

#[derive(Default)]
pub struct FakeSearch {
    pub suggestions: Vec<Suggestion>,
    pub calls: AtomicUsize,
}

impl FakeSearch {
    pub fn with(repos: &[&str]) -> Self {
        Self {
            suggestions: repos
                .iter()
                .map(|repo| Suggestion {
                    repo: repo.to_string(),
                    path: None,
                    description: None,
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BroadSearch for FakeSearch {
    async fn search(&self, _name: &str) -> Result<Vec<Suggestion>, SkillError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.suggestions.clone())
    }
}

/// Answers selections from a script and records what it was shown.
#[derive(Default)]
pub struct ScriptedChooser {
    answers: Mutex<VecDeque<Option<usize>>>,
    pub shown: Mutex<Vec<Vec<String>>>,
}

impl ScriptedChooser {
    pub fn answering(answers: &[Option<usize>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// A chooser that fails the test if it is ever asked.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&self, selection: &Selection<'_>) -> Result<Option<usize>, SkillError> {
        self.shown.lock().unwrap().push(selection.items.clone());
        let answer = self.answers.lock().unwrap().pop_front();
        match answer {
            Some(answer) => Ok(answer),
            None => panic!("unexpected prompt: {}", selection.prompt),
        }
    }
}
