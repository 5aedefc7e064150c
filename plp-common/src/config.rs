//! Configuration loading and resolution
//!
//! Settings are resolved per field with the following priority order:
//! 1. Command-line argument (applied by the binaries, highest priority)
//! 2. Environment variable (`PLP_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file never terminates startup; the compiled defaults
//! are used and a warning is logged.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default search endpoint (Spotify Web API)
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://api.spotify.com/v1";

/// Default per-request timeout for search API calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default cap on concurrently processed sentences
pub const DEFAULT_MAX_CONCURRENT_SENTENCES: usize = 8;

/// Default deadline for gathering all sentence workers of one message
pub const DEFAULT_GATHER_TIMEOUT_SECS: u64 = 60;

/// Default listen address for the web service
pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";

/// On-disk configuration file schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub search_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_concurrent_sentences: Option<usize>,
    pub gather_timeout_secs: Option<u64>,
    /// Path of the SQLite cache database (no value = no persistent cache)
    pub database: Option<PathBuf>,
    pub listen: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub search_base_url: String,
    pub request_timeout: Duration,
    pub max_concurrent_sentences: usize,
    pub gather_timeout: Duration,
    pub database: Option<PathBuf>,
    pub listen: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_concurrent_sentences: DEFAULT_MAX_CONCURRENT_SENTENCES,
            gather_timeout: Duration::from_secs(DEFAULT_GATHER_TIMEOUT_SECS),
            database: None,
            listen: DEFAULT_LISTEN.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from the environment and an optional config file.
    ///
    /// `config_file` overrides the platform default location (it is the
    /// CLI `--config` value). Binaries apply further per-flag overrides on
    /// top of the returned settings.
    pub fn resolve(config_file: Option<&Path>) -> Self {
        let toml_config = match load_toml_config(config_file) {
            Ok(config) => config,
            Err(Error::Config(reason)) => {
                warn!("No usable config file ({reason}); using defaults");
                TomlConfig::default()
            }
            Err(e) => {
                warn!("Failed to load config file: {e}; using defaults");
                TomlConfig::default()
            }
        };
        Self::from_toml(toml_config)
    }

    fn from_toml(toml_config: TomlConfig) -> Self {
        let defaults = Settings::default();

        let search_base_url = env_string("PLP_SEARCH_BASE_URL")
            .or(toml_config.search_base_url)
            .unwrap_or(defaults.search_base_url);

        let request_timeout = env_parse::<u64>("PLP_REQUEST_TIMEOUT_SECS")
            .or(toml_config.request_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_concurrent_sentences = env_parse::<usize>("PLP_MAX_CONCURRENT_SENTENCES")
            .or(toml_config.max_concurrent_sentences)
            .filter(|&limit| limit >= 1)
            .unwrap_or(defaults.max_concurrent_sentences);

        let gather_timeout = env_parse::<u64>("PLP_GATHER_TIMEOUT_SECS")
            .or(toml_config.gather_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.gather_timeout);

        let database = env_string("PLP_DATABASE")
            .map(PathBuf::from)
            .or(toml_config.database);

        let listen = env_string("PLP_LISTEN")
            .or(toml_config.listen)
            .unwrap_or(defaults.listen);

        let log_level = env_string("PLP_LOG")
            .or(toml_config.logging.level)
            .unwrap_or(defaults.log_level);

        Self {
            search_base_url,
            request_timeout,
            max_concurrent_sentences,
            gather_timeout,
            database,
            listen,
            log_level,
        }
    }
}

/// Load and parse the TOML config file.
///
/// With no explicit path, the platform config locations are searched
/// (user config directory first, `/etc/playlistpoetry` on Linux).
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))
}

/// Locate the configuration file for the current platform
fn default_config_path() -> Result<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("playlistpoetry").join("config.toml")) {
        if user_config.exists() {
            return Ok(user_config);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/playlistpoetry/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }
    Err(Error::Config("no config file found".to_string()))
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|v| v.parse().ok())
}
