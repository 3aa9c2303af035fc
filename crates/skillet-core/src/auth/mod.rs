//! Credential resolution for the code-hosting API.
//!
//! Lookup order: environment variable, persisted config, then the `gh` CLI's
//! cached token. The first answer (including "no token") is cached on the
//! resolver, so one resolver per command invocation queries the CLI at most
//! once.

use std::process::Stdio;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::config::SkilletConfig;

/// Environment variables checked, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

const CLI_TIMEOUT: Duration = Duration::from_secs(5);

/// External command that prints a token on stdout.
#[derive(Debug, Clone)]
pub struct CliTokenQuery {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CliTokenQuery {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: CLI_TIMEOUT,
        }
    }

    /// `gh auth token`
    pub fn gh() -> Self {
        Self::new("gh", ["auth", "token"])
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self) -> Option<String> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                non_empty(String::from_utf8_lossy(&output.stdout).as_ref())
            }
            Ok(Ok(output)) => {
                tracing::debug!(program = %self.program, status = %output.status, "token query exited unsuccessfully");
                None
            }
            Ok(Err(err)) => {
                tracing::debug!(program = %self.program, error = %err, "token query unavailable");
                None
            }
            Err(_) => {
                tracing::debug!(program = %self.program, "token query timed out");
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct AuthResolver {
    env_token: Option<String>,
    config_token: Option<String>,
    cli: Option<CliTokenQuery>,
    cached: OnceCell<Option<String>>,
}

impl AuthResolver {
    pub fn new(
        env_token: Option<String>,
        config_token: Option<String>,
        cli: Option<CliTokenQuery>,
    ) -> Self {
        Self {
            env_token: env_token.as_deref().and_then(non_empty),
            config_token: config_token.as_deref().and_then(non_empty),
            cli,
            cached: OnceCell::new(),
        }
    }

    /// Resolver reading the process environment and the given config, with
    /// the `gh` CLI as last resort.
    pub fn from_environment(config: &SkilletConfig) -> Self {
        let env_token = TOKEN_ENV_VARS
            .iter()
            .find_map(|key| std::env::var(key).ok().as_deref().and_then(non_empty));
        Self::new(
            env_token,
            config.token().map(str::to_string),
            Some(CliTokenQuery::gh()),
        )
    }

    /// Resolver that never finds a token.
    pub fn anonymous() -> Self {
        Self::new(None, None, None)
    }

    pub async fn resolve(&self) -> Option<String> {
        self.cached.get_or_init(|| self.lookup()).await.clone()
    }

    async fn lookup(&self) -> Option<String> {
        if let Some(token) = &self.env_token {
            tracing::debug!("using token from environment");
            return Some(token.clone());
        }
        if let Some(token) = &self.config_token {
            tracing::debug!("using token from config file");
            return Some(token.clone());
        }
        match &self.cli {
            Some(cli) => cli.run().await,
            None => None,
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
