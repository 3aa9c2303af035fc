use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{DEFAULT_API_BASE, http_client, status_error};
use crate::error::{SkillError, Suggestion};
use crate::git::MANIFEST_FILE;

/// Number of hits surfaced as suggestions.
pub const MAX_SUGGESTIONS: usize = 5;

/// Broad, imprecise search used as the last resolution phase. Results are
/// suggestions only.
#[async_trait]
pub trait BroadSearch: Send + Sync {
    async fn search(&self, name: &str) -> Result<Vec<Suggestion>, SkillError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RepositoryItem {
    full_name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CodeItem {
    path: String,
    repository: RepositoryItem,
}

/// GitHub search: code search for manifests when a token is available
/// (the endpoint requires one), repository search otherwise.
#[derive(Debug, Clone)]
pub struct GitHubSearch {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubSearch {
    pub fn new(token: Option<String>) -> Result<Self, SkillError> {
        Ok(Self {
            client: http_client()?,
            api_base: DEFAULT_API_BASE.to_string(),
            token,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        q: &str,
    ) -> Result<Vec<T>, SkillError> {
        let url = format!("{}/search/{}", self.api_base, endpoint);
        debug!("GET {} q={}", url, q);
        let per_page = MAX_SUGGESTIONS.to_string();
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[("q", q), ("per_page", per_page.as_str())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(status_error(&response, &format!("{} search", endpoint)));
        }
        let body: SearchResponse<T> = response.json().await?;
        Ok(body.items)
    }
}

#[async_trait]
impl BroadSearch for GitHubSearch {
    async fn search(&self, name: &str) -> Result<Vec<Suggestion>, SkillError> {
        let suggestions: Vec<Suggestion> = if self.token.is_some() {
            let q = format!("filename:{} {}", MANIFEST_FILE, name);
            self.query::<CodeItem>("code", &q)
                .await?
                .into_iter()
                .map(|item| Suggestion {
                    repo: item.repository.full_name,
                    path: Some(item.path),
                    description: item.repository.description,
                })
                .collect()
        } else {
            let q = format!("{} skill in:name,description", name);
            self.query::<RepositoryItem>("repositories", &q)
                .await?
                .into_iter()
                .map(|item| Suggestion {
                    repo: item.full_name,
                    path: None,
                    description: item.description,
                })
                .collect()
        };
        Ok(suggestions.into_iter().take(MAX_SUGGESTIONS).collect())
    }
}
