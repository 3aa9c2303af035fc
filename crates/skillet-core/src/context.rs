//! Application context: paths, configuration and service construction.
//!
//! Frontends create one context per invocation and pass it to commands.
//! Nothing in the core keeps process-wide state; the cached credential and
//! the index key rotation live on services built from this context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::auth::AuthResolver;
use crate::config::{ConfigStore, SkilletConfig};
use crate::github::{ArtifactFetcher, BroadSearch, GitHubSearch, RepoHost};
use crate::integration::{DEFAULT_INTEGRATION, Integration, ScopeRoots};
use crate::registry::{IndexClient, RankingPolicy, SkillIndex};
use crate::skills::installer::SkillInstaller;
use crate::source::{
    Chooser, DirectRepoResolver, LocalResolver, RegistryResolver, SourceResolver,
};
use crate::update::UpdateEngine;

/// Remote services used by resolution and the outdated check.
#[derive(Clone)]
pub struct RemoteServices {
    pub host: Arc<dyn RepoHost>,
    pub index: Arc<dyn SkillIndex>,
    pub broad: Arc<dyn BroadSearch>,
}

#[derive(Debug)]
pub struct AppContext {
    home_dir: PathBuf,
    project_root: PathBuf,
    config_dir: PathBuf,
    temp_dir: PathBuf,
    config: SkilletConfig,
    auth: AuthResolver,
    ranking: RankingPolicy,
}

impl AppContext {
    /// Create a context with explicit paths and configuration.
    pub fn new(
        home_dir: PathBuf,
        project_root: PathBuf,
        config_dir: PathBuf,
        config: SkilletConfig,
        auth: AuthResolver,
    ) -> Self {
        Self {
            home_dir,
            project_root,
            config_dir,
            temp_dir: std::env::temp_dir(),
            config,
            auth,
            ranking: RankingPolicy::default(),
        }
    }

    /// Context for the current user and working directory.
    pub fn from_environment() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let project_root = std::env::current_dir().context("Failed to get current directory")?;
        let store = ConfigStore::from_default_dir()?;
        let config = store.load()?;
        let config_dir = store
            .config_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| home_dir.join(".config").join("skillet"));
        let auth = AuthResolver::from_environment(&config);
        Ok(Self::new(home_dir, project_root, config_dir, config, auth))
    }

    /// Directory receiving temporary clones.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config(&self) -> &SkilletConfig {
        &self.config
    }

    pub fn scope_roots(&self) -> ScopeRoots {
        ScopeRoots::new(self.project_root.clone(), self.home_dir.clone())
    }

    /// Integration used when auto-detection finds nothing.
    pub fn default_integration(&self) -> anyhow::Result<Integration> {
        match self.config.default_integration.as_deref() {
            Some(id) => Integration::from_id(id)
                .ok_or_else(|| anyhow::anyhow!("Unknown default_integration '{}' in config", id)),
            None => Ok(DEFAULT_INTEGRATION),
        }
    }

    /// Build the GitHub and index clients, resolving the credential once.
    pub async fn remote_services(&self) -> anyhow::Result<RemoteServices> {
        let token = self.auth.resolve().await;
        let fetcher = ArtifactFetcher::new(token.clone())?;
        let search = GitHubSearch::new(token)?;
        let index = IndexClient::new(self.config.index_url(), self.config.index_api_keys.clone())?;
        Ok(RemoteServices {
            host: Arc::new(fetcher),
            index: Arc::new(index),
            broad: Arc::new(search),
        })
    }

    pub fn source_resolver(&self, remote: &RemoteServices, chooser: Arc<dyn Chooser>) -> SourceResolver {
        let local = LocalResolver::new(self.project_root.clone(), self.home_dir.clone());
        let direct = DirectRepoResolver::new(remote.host.clone(), chooser.clone());
        let registry = RegistryResolver::new(
            remote.index.clone(),
            remote.broad.clone(),
            direct.clone(),
            chooser,
            self.config.fallback_repos(),
        )
        .with_policy(self.ranking);
        SourceResolver::new(local, direct, registry)
    }

    pub fn skill_installer(&self) -> SkillInstaller {
        SkillInstaller::new(self.scope_roots())
    }

    pub fn update_engine(&self) -> UpdateEngine {
        UpdateEngine::new(self.temp_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstallScope;

    fn context(config: SkilletConfig) -> AppContext {
        AppContext::new(
            PathBuf::from("/home/me"),
            PathBuf::from("/work/app"),
            PathBuf::from("/home/me/.config/skillet"),
            config,
            AuthResolver::anonymous(),
        )
    }

    #[test]
    fn default_integration_comes_from_config() {
        assert_eq!(
            context(SkilletConfig::new()).default_integration().unwrap(),
            DEFAULT_INTEGRATION
        );

        let config = SkilletConfig {
            default_integration: Some("codex".into()),
            ..SkilletConfig::default()
        };
        assert_eq!(
            context(config).default_integration().unwrap(),
            Integration::Codex
        );
    }

    #[test]
    fn unknown_default_integration_is_an_error() {
        let config = SkilletConfig {
            default_integration: Some("vim".into()),
            ..SkilletConfig::default()
        };
        let err = context(config).default_integration().unwrap_err();
        assert!(err.to_string().contains("vim"));
    }

    #[test]
    fn scope_roots_follow_paths() {
        let roots = context(SkilletConfig::new()).scope_roots();
        assert_eq!(roots.root(InstallScope::Project), Path::new("/work/app"));
        assert_eq!(roots.root(InstallScope::Global), Path::new("/home/me"));
    }

    #[tokio::test]
    async fn remote_services_build_without_network() {
        let ctx = context(SkilletConfig::new());
        assert!(ctx.remote_services().await.is_ok());
    }
}
