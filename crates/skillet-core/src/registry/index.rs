//! Indexed skill search.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::SkillError;
use crate::github::{http_client, status_error};

/// Upper bound on results requested per query.
const RESULT_LIMIT: usize = 20;

/// One result of the indexed search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub owner: String,
    pub repo: String,
    /// Directory of the skill inside the repository
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "stars")]
    pub popularity: u64,
}

impl SearchHit {
    /// Path-like identifier used for the last-segment bonus.
    pub fn identifier(&self) -> &str {
        self.path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[async_trait]
pub trait SkillIndex: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SkillError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndexResponse {
    List(Vec<SearchHit>),
    Wrapped {
        #[serde(alias = "results")]
        skills: Vec<SearchHit>,
    },
}

/// HTTP client for the search index. API keys, when several are configured,
/// are used in turn, one per request.
#[derive(Debug)]
pub struct IndexClient {
    client: reqwest::Client,
    url: String,
    api_keys: Vec<String>,
    next_key: AtomicUsize,
}

impl IndexClient {
    pub fn new(url: impl Into<String>, api_keys: Vec<String>) -> Result<Self, SkillError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
            api_keys: api_keys.into_iter().filter(|k| !k.trim().is_empty()).collect(),
            next_key: AtomicUsize::new(0),
        })
    }

    fn next_key(&self) -> Option<&str> {
        if self.api_keys.is_empty() {
            return None;
        }
        let index = self.next_key.fetch_add(1, Ordering::Relaxed) % self.api_keys.len();
        Some(&self.api_keys[index])
    }
}

#[async_trait]
impl SkillIndex for IndexClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SkillError> {
        debug!("Index search for '{}' at {}", query, self.url);
        let limit = RESULT_LIMIT.to_string();
        let mut request = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("limit", limit.as_str())]);
        if let Some(key) = self.next_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(status_error(&response, "skill index"));
        }
        let hits = match response.json::<IndexResponse>().await? {
            IndexResponse::List(hits) => hits,
            IndexResponse::Wrapped { skills } => skills,
        };
        Ok(hits)
    }
}
