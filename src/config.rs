use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::tracking::policy::TrackingPolicy;
use crate::version::registries::epr;

// =============================================================================
// Defaults
// =============================================================================

/// Config file looked up when none is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "tracker.yml";

/// Default root of the local asset store
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Channels tracked when a package does not name any
pub const DEFAULT_CHANNELS: [&str; 3] = ["production", "staging", "snapshot"];

/// Delay between starting each registry request to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Errors raised while loading configuration or resolving the tracking policy
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid tracked-packages entry: {0}")]
    InvalidShape(String),

    #[error("Invalid settings for package {package}: {reason}")]
    InvalidSettings { package: String, reason: String },

    #[error("Invalid minimum-version for package {package}: {value}")]
    InvalidMinimumVersion { package: String, value: String },
}

/// Top-level configuration document
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Raw tracked-packages value, resolved by [`Config::tracking_policy`]
    pub tracked_packages: serde_yaml::Value,
    pub assets_dir: PathBuf,
    pub registries: RegistriesConfig,
    pub installer: InstallerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracked_packages: serde_yaml::Value::Null,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            registries: RegistriesConfig::default(),
            installer: InstallerConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load the named file, or fall back to the default file if present,
    /// or to the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    debug!("No config file found, tracking nothing");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve the tracked-packages value into a tracking policy
    pub fn tracking_policy(&self) -> Result<TrackingPolicy, ConfigError> {
        TrackingPolicy::resolve(&self.tracked_packages)
    }
}

/// Registry base URL per channel
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct RegistriesConfig {
    pub overrides: IndexMap<String, String>,
}

impl RegistriesConfig {
    /// Base URL of the registry publishing the given channel
    pub fn url_for(&self, channel: &str) -> Option<&str> {
        self.overrides
            .get(channel)
            .map(String::as_str)
            .or_else(|| default_registry_url(channel))
    }
}

fn default_registry_url(channel: &str) -> Option<&'static str> {
    match channel {
        "production" => Some(epr::DEFAULT_BASE_URL),
        "staging" => Some("https://epr-staging.elastic.co"),
        "snapshot" => Some("https://epr-snapshot.elastic.co"),
        _ => None,
    }
}

/// External installer invocation
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct InstallerConfig {
    /// Program to run; `None` disables updates
    pub command: Option<String>,
    /// Arguments, with `{package}`, `{version}`, `{channel}` and `{dest}` substituted
    pub args: Vec<String>,
    pub timeout_secs: Option<u64>,
}

/// Returns the path to the data directory for package-tracker.
/// Uses $XDG_DATA_HOME/package-tracker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/package-tracker,
/// or ./package-tracker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default log file.
pub fn log_path() -> PathBuf {
    data_dir().join("package-tracker.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("package-tracker")
}
