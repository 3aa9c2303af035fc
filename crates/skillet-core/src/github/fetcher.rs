use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{RepoHost, RepoTree, TreeEntry, branch_candidates, http_client, status_error};
use crate::error::SkillError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// GitHub REST + raw content client.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
}

impl ArtifactFetcher {
    pub fn new(token: Option<String>) -> Result<Self, SkillError> {
        Ok(Self {
            client: http_client()?,
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            token,
        })
    }

    /// Point the client at other endpoints (mirrors, test servers).
    pub fn with_base_urls(mut self, api_base: impl Into<String>, raw_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.raw_base = raw_base.into().trim_end_matches('/').to_string();
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, SkillError> {
        debug!("GET {}", url);
        let response = self
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(&response, what));
        }
        Ok(response.json().await?)
    }

    async fn try_branches<T, F, Fut>(
        &self,
        requested: Option<&str>,
        mut attempt: F,
    ) -> Result<(String, T), SkillError>
    where
        F: FnMut(String) -> Fut,
        Fut: std::future::Future<Output = Result<T, SkillError>>,
    {
        let mut last_err = None;
        for branch in branch_candidates(requested) {
            match attempt(branch.to_string()).await {
                Ok(value) => return Ok((branch.to_string(), value)),
                Err(e @ SkillError::RateLimited(_)) => return Err(e),
                Err(e) => {
                    debug!("Branch {} failed: {}", branch, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| SkillError::not_found("No branch to try")))
    }
}

#[async_trait]
impl RepoHost for ArtifactFetcher {
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<RepoTree, SkillError> {
        let (branch, response) = self
            .try_branches(branch, |branch| async move {
                let url = format!(
                    "{}/repos/{}/{}/git/trees/{}?recursive=1",
                    self.api_base, owner, repo, branch
                );
                self.get_json::<TreeResponse>(&url, &format!("{}/{}@{}", owner, repo, branch))
                    .await
            })
            .await?;

        if response.truncated {
            tracing::warn!("Tree listing for {}/{} was truncated", owner, repo);
        }
        Ok(RepoTree {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch,
            entries: response.tree,
        })
    }

    async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Vec<u8>, SkillError> {
        let (_, bytes) = self
            .try_branches(branch, |branch| async move {
                self.fetch_raw_at(owner, repo, path, &branch).await
            })
            .await?;
        Ok(bytes)
    }

    async fn fetch_raw_at(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<u8>, SkillError> {
        let url = format!("{}/{}/{}/{}/{}", self.raw_base, owner, repo, branch, path);
        debug!("GET {}", url);
        let response = self.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(&response, path));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<String, SkillError> {
        let (_, commit) = self
            .try_branches(branch, |branch| async move {
                let url = format!("{}/repos/{}/{}/commits/{}", self.api_base, owner, repo, branch);
                self.get_json::<CommitResponse>(&url, &format!("{}/{}@{}", owner, repo, branch))
                    .await
            })
            .await?;
        Ok(commit.sha)
    }
}
