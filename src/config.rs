//! Configuration management.
//!
//! Two layers of configuration:
//!
//! - [`ClientConfig`] — endpoint, bearer token, and user agent for the
//!   GitHub GraphQL client. Built explicitly and injected into the client;
//!   the client itself never reads the environment. The token is optional
//!   here and only required when a request is actually attempted.
//! - [`Config`] — the content root and the list of sources to sync, loaded
//!   from a `discus.json` file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed GitHub GraphQL endpoint.
pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// User agent sent with every API request.
pub const USER_AGENT: &str = concat!("discus/", env!("CARGO_PKG_VERSION"));

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "discus.json";

/// Primary and fallback environment variables for the bearer token.
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Connection settings for the GraphQL client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Bearer token, if one could be resolved. Checked lazily at request
    /// time so read-only commands work without credentials.
    pub token: Option<String>,
    /// User-agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Build a config with the fixed endpoint and an explicit token.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            endpoint: GITHUB_GRAPHQL_ENDPOINT.to_string(),
            token,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Build a config resolving the token from the environment
    /// (`GITHUB_TOKEN`, falling back to `GH_TOKEN`).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(resolve_token())
    }
}

/// Resolve the bearer token from the environment.
///
/// Prefers `GITHUB_TOKEN`; falls back to `GH_TOKEN`. Empty values are
/// treated as unset.
#[must_use]
pub fn resolve_token() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

/// One configured discussion source: a repository plus the discussion
/// categories to pull from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Stable source name, recorded on every synced record.
    pub name: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Discussion category names to sync. Matched case-insensitively.
    pub categories: Vec<String>,
}

/// Top-level sync configuration, loaded from `discus.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory the content tree is written into, relative to the config
    /// file's directory unless absolute.
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,
    /// Sources to sync.
    pub sources: Vec<SourceConfig>,
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// The `content_root` is resolved relative to the config file's parent
    /// directory when it is not absolute.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file does not exist, or a config
    /// error if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

        if config.content_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.content_root = parent.join(&config.content_root);
            }
        }

        Ok(config)
    }

    /// Find a source by name.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}
