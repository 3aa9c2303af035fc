use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Resolution;
use super::direct::DirectRepoResolver;
use super::select::{Chooser, Selection, choose_index};
use crate::error::{SkillError, Suggestion};
use crate::git::{MANIFEST_FILE, RepoRef};
use crate::github::BroadSearch;
use crate::metadata::SourceType;
use crate::registry::{RankedHit, RankingPolicy, SkillIndex};

/// Escape option appended to the indexed search candidates.
const SEARCH_MORE: &str = "Search more broadly";

/// Resolves bare skill names through three phases, stopping at the first
/// that installs something:
/// 1. indexed search, ranked and auto-selected where unambiguous
/// 2. well-known skill collections, by directory name
/// 3. broad search, which only ever produces suggestions
pub struct RegistryResolver {
    index: Arc<dyn SkillIndex>,
    broad: Arc<dyn BroadSearch>,
    direct: DirectRepoResolver,
    chooser: Arc<dyn Chooser>,
    policy: RankingPolicy,
    fallback_repos: Vec<String>,
}

impl RegistryResolver {
    pub fn new(
        index: Arc<dyn SkillIndex>,
        broad: Arc<dyn BroadSearch>,
        direct: DirectRepoResolver,
        chooser: Arc<dyn Chooser>,
        fallback_repos: Vec<String>,
    ) -> Self {
        Self {
            index,
            broad,
            direct,
            chooser,
            policy: RankingPolicy::default(),
            fallback_repos,
        }
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn resolve(&self, name: &str) -> Result<Resolution, SkillError> {
        if let Some(resolution) = self.indexed_search(name).await? {
            return Ok(resolution);
        }
        if let Some(resolution) = self.fallback_collections(name).await? {
            return Ok(resolution);
        }
        Err(self.broad_search(name).await)
    }

    async fn indexed_search(&self, name: &str) -> Result<Option<Resolution>, SkillError> {
        let hits = match self.index.search(name).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Skill index unavailable, trying known collections: {}", e);
                return Ok(None);
            }
        };
        let ranked = self.policy.rank(hits, name);
        if ranked.is_empty() {
            debug!("No indexed match for '{}'", name);
            return Ok(None);
        }

        let chosen = match self.policy.auto_select(&ranked) {
            Some(hit) => {
                debug!("Auto-selected {} (score {})", hit.hit.slug(), hit.score);
                hit
            }
            None => {
                let mut items: Vec<String> = ranked.iter().map(candidate_label).collect();
                items.push(SEARCH_MORE.to_string());
                let selection = Selection {
                    query: name,
                    prompt: format!("Several skills match '{}'", name),
                    items,
                };
                let index = choose_index(self.chooser.as_ref(), &selection)?;
                match ranked.get(index) {
                    Some(hit) => hit,
                    None => return Ok(None),
                }
            }
        };

        let mut repo_ref = RepoRef::new(&chosen.hit.owner, &chosen.hit.repo);
        if let Some(path) = &chosen.hit.path {
            repo_ref = repo_ref.with_subpath(path);
        }
        fall_through(self.direct.resolve(&repo_ref, SourceType::Registry).await)
    }

    async fn fallback_collections(&self, name: &str) -> Result<Option<Resolution>, SkillError> {
        for repo in &self.fallback_repos {
            let repo_ref = match RepoRef::parse(repo) {
                Ok(parsed) => parsed.with_subpath(name),
                Err(e) => {
                    warn!("Ignoring fallback repository '{}': {}", repo, e);
                    continue;
                }
            };
            debug!("Looking for '{}' in {}", name, repo_ref.slug());
            if let Some(resolution) =
                fall_through(self.direct.resolve(&repo_ref, SourceType::Registry).await)?
            {
                info!("Found '{}' in {}", name, repo_ref.slug());
                return Ok(Some(resolution));
            }
        }
        Ok(None)
    }

    /// Final phase. Always an error: suggestions are never installed.
    async fn broad_search(&self, name: &str) -> SkillError {
        let suggestions: Vec<Suggestion> = match self.broad.search(name).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!("Broad search failed: {}", e);
                Vec::new()
            }
        };

        let browse = browse_url(name);
        let message = if suggestions.is_empty() {
            format!("No skill named '{}' found. Browse: {}", name, browse)
        } else {
            format!(
                "No skill named '{}' could be installed automatically. \
                 Re-run with one of the suggested owner/repo sources, or browse: {}",
                name, browse
            )
        };
        SkillError::NotFound {
            message,
            suggestions,
        }
    }
}

/// Misses and transient failures move on to the next phase; everything
/// else (cancellation, ambiguity) stops the pipeline.
fn fall_through(result: Result<Resolution, SkillError>) -> Result<Option<Resolution>, SkillError> {
    match result {
        Ok(resolution) => Ok(Some(resolution)),
        Err(e @ SkillError::NotFound { .. }) => {
            debug!("{}", e);
            Ok(None)
        }
        Err(e) if e.is_transient() => {
            warn!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn candidate_label(ranked: &RankedHit) -> String {
    let hit = &ranked.hit;
    let location = match hit.path.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}", hit.slug(), path),
        None => hit.slug(),
    };
    match hit.description.as_deref().filter(|d| !d.is_empty()) {
        Some(desc) => format!("{} ({}, {} stars) - {}", hit.name, location, hit.popularity, desc),
        None => format!("{} ({}, {} stars)", hit.name, location, hit.popularity),
    }
}

pub(crate) fn browse_url(name: &str) -> String {
    let query = format!("filename:{} {}", MANIFEST_FILE, name);
    url::Url::parse_with_params("https://github.com/search", &[("q", query.as_str()), ("type", "code")])
        .map(String::from)
        .unwrap_or_else(|_| "https://github.com/search".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_url_encodes_query() {
        assert_eq!(
            browse_url("pdf tools"),
            "https://github.com/search?q=filename%3ASKILL.md+pdf+tools&type=code"
        );
    }
}
