//! User configuration (`config.toml`).

mod store;

pub use store::ConfigStore;

use serde::Deserialize;

/// Default endpoint for the indexed skill search.
pub const DEFAULT_INDEX_URL: &str = "https://skillsmp.com/api/v1/skills/search";

/// Large public skill collections tried when the index has no usable match.
pub const DEFAULT_FALLBACK_REPOS: [&str; 3] = [
    "anthropics/skills",
    "obra/superpowers",
    "ComposioHQ/awesome-claude-skills",
];

/// Persisted configuration loaded from `<config_dir>/skillet/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkilletConfig {
    /// Token for the code-hosting API
    #[serde(default)]
    pub github_token: Option<String>,

    /// Indexed search endpoint
    #[serde(default)]
    pub index_url: Option<String>,

    /// API keys for the indexed search, used round-robin
    #[serde(default)]
    pub index_api_keys: Vec<String>,

    /// Replaces the built-in list of well-known skill repositories
    #[serde(default)]
    pub fallback_repos: Option<Vec<String>>,

    /// Integration used when nothing is detected
    #[serde(default)]
    pub default_integration: Option<String>,
}

impl SkilletConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_url(&self) -> &str {
        self.index_url.as_deref().unwrap_or(DEFAULT_INDEX_URL)
    }

    pub fn fallback_repos(&self) -> Vec<String> {
        match &self.fallback_repos {
            Some(repos) => repos.clone(),
            None => DEFAULT_FALLBACK_REPOS.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Persisted token, ignoring blank values.
    pub fn token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
