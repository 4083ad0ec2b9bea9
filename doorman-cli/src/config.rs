//! Environment-variable configuration for both subcommands.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use doorman_core::JoinConfig;

pub const DEFAULT_CONFIG_PATH: &str = ".github/join-config.yml";

/// Shared configuration: credentials, repository, and the join config path.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub repo: String,
    /// From `ORG` when set; otherwise resolved from the config file.
    pub org: Option<String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("GH_TOKEN")
            .context("GH_TOKEN environment variable is required")?
            .trim()
            .to_string();
        if token.is_empty() {
            anyhow::bail!("GH_TOKEN environment variable is empty");
        }

        let repo = env::var("REPO")
            .context("REPO environment variable is required")?
            .trim()
            .to_string();
        if repo.is_empty() {
            anyhow::bail!("REPO environment variable is empty");
        }

        let org = env::var("ORG")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let config_path = env::var("JOIN_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Ok(Config {
            token,
            repo,
            org,
            config_path,
        })
    }

    /// The organization to act on: `ORG` wins, the config file's `org` is
    /// the fallback, and having neither is a startup error.
    pub fn resolve_org(&self, join_config: &JoinConfig) -> Result<String> {
        resolve_org(self.org.clone(), join_config.org.clone())
    }
}

fn resolve_org(env_org: Option<String>, config_org: Option<String>) -> Result<String> {
    env_org
        .or(config_org)
        .context("organization is not set in the ORG environment variable or the join config file")
}

/// The per-event fields the CI workflow passes through the environment.
#[derive(Debug, Clone)]
pub struct EventPayload {
    pub issue_number: u64,
    pub author: String,
    pub event_name: String,
    pub event_action: String,
    pub label_name: String,
    pub comment_body: String,
    pub actor: String,
}

impl EventPayload {
    pub fn from_env() -> Result<Self> {
        let issue_number = env::var("ISSUE_NUMBER")
            .context("ISSUE_NUMBER environment variable is required")?
            .parse::<u64>()
            .context("ISSUE_NUMBER must be a valid number")?;

        let author =
            env::var("ISSUE_AUTHOR").context("ISSUE_AUTHOR environment variable is required")?;

        Ok(EventPayload {
            issue_number,
            author,
            event_name: env::var("EVENT_NAME").unwrap_or_default(),
            event_action: env::var("EVENT_ACTION").unwrap_or_default(),
            label_name: env::var("LABEL_NAME").unwrap_or_default(),
            comment_body: env::var("COMMENT_BODY").unwrap_or_default(),
            actor: env::var("ACTOR").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_org_prefers_environment() {
        assert_eq!(
            resolve_org(Some("env-org".into()), Some("cfg-org".into())).unwrap(),
            "env-org"
        );
    }

    #[test]
    fn test_resolve_org_falls_back_to_config() {
        assert_eq!(resolve_org(None, Some("cfg-org".into())).unwrap(), "cfg-org");
    }

    #[test]
    fn test_resolve_org_missing_everywhere_is_an_error() {
        assert!(resolve_org(None, None).is_err());
    }
}
