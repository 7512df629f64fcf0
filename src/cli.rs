//! Command-line interface parsing for the Pokedex shell
//!
//! This module handles parsing of CLI arguments using clap and validating
//! them into the `Config` the shell is started with.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;

use crate::api::client::DEFAULT_TIMEOUT;
use crate::api::DEFAULT_BASE_URL;

/// Default cache time-to-live in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Default network timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// A duration flag was zero
    #[error("Invalid value for --{0}: must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Pokedex - browse PokeAPI locations and catch Pokemon from an interactive shell
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive Pokedex shell backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// Root URL of the PokeAPI instance to query
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds a response stays cached; also the cache sweep period
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Seconds to wait for a single network request
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// File to load and save input history
    #[arg(long, value_name = "PATH", conflicts_with = "no_history")]
    pub history: Option<PathBuf>,

    /// Do not load or save input history
    #[arg(long)]
    pub no_history: bool,

    /// Log filter, e.g. `debug` or `pokedex=trace` (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

/// Validated startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
    /// Where history is persisted, if anywhere
    pub history_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(Config)` with durations converted and the history path resolved
    /// * `Err(CliError)` if a value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if !(cli.base_url.starts_with("http://") || cli.base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }
        if cli.cache_ttl == 0 {
            return Err(CliError::ZeroDuration("cache-ttl"));
        }
        if cli.timeout == 0 {
            return Err(CliError::ZeroDuration("timeout"));
        }

        let history_path = if cli.no_history {
            None
        } else {
            cli.history.clone().or_else(default_history_path)
        };

        Ok(Config {
            base_url: cli.base_url.clone(),
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            timeout: Duration::from_secs(cli.timeout),
            history_path,
            log_level: cli.log_level.clone(),
        })
    }
}

/// XDG-compliant history location, e.g. `~/.local/share/pokedex/history.txt` on Linux
///
/// Returns `None` if no home directory can be determined.
pub fn default_history_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "pokedex")?;
    Some(project_dirs.data_dir().join("history.txt"))
}
