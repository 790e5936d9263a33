//! Tracking policy resolution
//!
//! Turns the `tracked-packages` configuration value into a [`TrackingPolicy`].
//! Accepted shapes:
//!
//! ```yaml
//! tracked-packages: endpoint                 # bare name
//! tracked-packages:                          # mapping of name -> settings
//!   endpoint:
//!     channels: production, staging
//!     minimum-version: 8.2
//!   system:                                  # no settings
//! tracked-packages:                          # list mixing both forms
//!   - endpoint
//!   - system:
//!       channels: [production]
//! ```

use indexmap::IndexMap;
use semver::Version;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;

use crate::config::{ConfigError, DEFAULT_CHANNELS};
use crate::version::semver::parse_padded_version;

/// How a minimum-version floor treats versions already held locally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloorMode {
    /// Remote versions below the floor are still considered when the local
    /// store already holds them, so raising the floor never reports adopted
    /// versions as local-only.
    #[default]
    RetainAdopted,
    /// Remote versions below the floor are always dropped.
    Strict,
}

/// Tracking settings for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePolicy {
    pub channels: Vec<String>,
    pub minimum_version: Option<Version>,
    pub floor_mode: FloorMode,
}

impl Default for PackagePolicy {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
            minimum_version: None,
            floor_mode: FloorMode::default(),
        }
    }
}

impl PackagePolicy {
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_minimum_version(mut self, version: Version) -> Self {
        self.minimum_version = Some(version);
        self
    }

    pub fn with_floor_mode(mut self, mode: FloorMode) -> Self {
        self.floor_mode = mode;
        self
    }
}

/// Per-package tracking policy, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingPolicy {
    packages: IndexMap<String, PackagePolicy>,
}

impl TrackingPolicy {
    /// Resolve a `tracked-packages` configuration value
    pub fn resolve(value: &Value) -> Result<Self, ConfigError> {
        let mut packages = IndexMap::new();

        match value {
            Value::Null => {}
            Value::Sequence(entries) => {
                for entry in entries {
                    resolve_entry(entry, &mut packages)?;
                }
            }
            other => resolve_entry(other, &mut packages)?,
        }

        Ok(Self { packages })
    }

    pub fn get(&self, package: &str) -> Option<&PackagePolicy> {
        self.packages.get(package)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackagePolicy)> {
        self.packages.iter().map(|(name, policy)| (name.as_str(), policy))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Every channel named by any package, first occurrence first
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = Vec::new();
        for policy in self.packages.values() {
            for channel in &policy.channels {
                if !channels.contains(channel) {
                    channels.push(channel.clone());
                }
            }
        }
        channels
    }
}

impl<S: Into<String>> FromIterator<(S, PackagePolicy)> for TrackingPolicy {
    fn from_iter<I: IntoIterator<Item = (S, PackagePolicy)>>(iter: I) -> Self {
        Self {
            packages: iter
                .into_iter()
                .map(|(name, policy)| (name.into(), policy))
                .collect(),
        }
    }
}

/// Settings as written in the configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct PackageSettings {
    #[serde(alias = "branches")]
    channels: Option<ChannelsSetting>,
    minimum_version: Option<Value>,
    floor_mode: FloorMode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChannelsSetting {
    CommaSeparated(String),
    List(Vec<String>),
}

fn resolve_entry(
    entry: &Value,
    packages: &mut IndexMap<String, PackagePolicy>,
) -> Result<(), ConfigError> {
    match entry {
        Value::String(name) => {
            packages.insert(name.clone(), PackagePolicy::default());
        }
        Value::Mapping(mapping) => {
            for (name, settings) in mapping {
                let Value::String(name) = name else {
                    return Err(ConfigError::InvalidShape(format!(
                        "package name must be a string, got {}",
                        describe(name)
                    )));
                };
                let policy = resolve_settings(name, settings)?;
                packages.insert(name.clone(), policy);
            }
        }
        other => {
            return Err(ConfigError::InvalidShape(format!(
                "expected a package name or a mapping, got {}",
                describe(other)
            )));
        }
    }
    Ok(())
}

fn resolve_settings(package: &str, settings: &Value) -> Result<PackagePolicy, ConfigError> {
    let settings: PackageSettings = match settings {
        Value::Null => PackageSettings::default(),
        Value::Mapping(_) => serde_yaml::from_value(settings.clone()).map_err(|e| {
            ConfigError::InvalidSettings {
                package: package.to_string(),
                reason: e.to_string(),
            }
        })?,
        other => {
            return Err(ConfigError::InvalidSettings {
                package: package.to_string(),
                reason: format!("expected a mapping, got {}", describe(other)),
            });
        }
    };

    let mut policy = PackagePolicy {
        floor_mode: settings.floor_mode,
        ..PackagePolicy::default()
    };

    let channels = match settings.channels {
        Some(ChannelsSetting::CommaSeparated(csv)) => split_channels(csv.split(',')),
        Some(ChannelsSetting::List(list)) => split_channels(list.iter().map(String::as_str)),
        None => Vec::new(),
    };
    if !channels.is_empty() {
        policy.channels = channels;
    }

    if let Some(value) = settings.minimum_version {
        policy.minimum_version = resolve_minimum_version(package, &value)?;
    }

    Ok(policy)
}

fn split_channels<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut channels: Vec<String> = Vec::new();
    for channel in raw.map(str::trim).filter(|c| !c.is_empty()) {
        if !channels.iter().any(|c| c == channel) {
            channels.push(channel.to_string());
        }
    }
    channels
}

/// Coerce a configured floor to a three-component version.
///
/// YAML reads an unquoted `8.2` as a float, so numbers are accepted and
/// formatted back to text before padding.
fn resolve_minimum_version(package: &str, value: &Value) -> Result<Option<Version>, ConfigError> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(hint) = float_floor_hint(package, n) {
                warn!("{}", hint);
            }
            n.to_string()
        }
        other => {
            return Err(ConfigError::InvalidMinimumVersion {
                package: package.to_string(),
                value: describe(other),
            });
        }
    };

    parse_padded_version(&raw)
        .map(Some)
        .map_err(|_| ConfigError::InvalidMinimumVersion {
            package: package.to_string(),
            value: raw,
        })
}

/// Warning for a floor YAML read as a float, where `8.10` has already lost
/// its trailing zero
fn float_floor_hint(package: &str, number: &serde_yaml::Number) -> Option<String> {
    number.is_f64().then(|| {
        format!(
            "minimum-version {} for package {} was read as a number; quote it (e.g. '8.10') to keep every digit",
            number, package
        )
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}
