//! Command implementations.

pub mod completions;
pub mod record;
pub mod status;
pub mod sync;
pub mod version;

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::storage::ContentStore;

/// Resolve the config file path from the CLI, defaulting to
/// `./discus.json`.
pub(crate) fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load the config file named by the CLI.
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(&config_path(cli))
}

/// Resolve the content store for read-only commands.
///
/// `--root` wins; otherwise the config's `contentRoot` is used when a
/// config file exists; otherwise `./content`. Only a missing config file
/// falls back to the default — a malformed one is an error, not silence.
///
/// # Errors
///
/// Returns an error if an existing config file cannot be read or parsed.
pub(crate) fn resolve_store(cli: &Cli) -> Result<ContentStore> {
    if let Some(root) = &cli.root {
        return Ok(ContentStore::new(root.clone()));
    }

    match load_config(cli) {
        Ok(config) => Ok(ContentStore::new(config.content_root)),
        Err(Error::ConfigNotFound { .. }) => Ok(ContentStore::new("content")),
        Err(e) => Err(e),
    }
}
