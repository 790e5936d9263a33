//! Inventory of known package versions from one source

use std::collections::{BTreeMap, BTreeSet, HashMap};

use semver::Version;
use tracing::debug;

use crate::version::error::InvalidVersionError;
use crate::version::semver::parse_version;
use crate::version::types::{Metadata, SourceEntry};

/// Compound `(package, channel)` key of an inventory bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub package: String,
    pub channel: String,
}

impl BucketKey {
    pub fn new(package: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            channel: channel.into(),
        }
    }
}

/// Versions of one (package, channel) pair and their metadata
pub type VersionMap = BTreeMap<Version, Metadata>;

/// Materialized set of known (package, channel, version) triples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    buckets: HashMap<BucketKey, VersionMap>,
}

impl Inventory {
    /// Build an inventory from source entries.
    ///
    /// Entries without metadata are skipped. A repeated (package, channel,
    /// version) keeps the metadata of the last occurrence.
    pub fn from_entries<I>(entries: I) -> Result<Self, InvalidVersionError>
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        Self::try_from_entries(entries.into_iter().map(Ok::<_, InvalidVersionError>))
    }

    /// Build an inventory from a fallible source, stopping at the first error.
    pub fn try_from_entries<I, E>(entries: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<SourceEntry, E>>,
        E: From<InvalidVersionError>,
    {
        let mut inventory = Self::default();

        for entry in entries {
            let entry = entry?;
            let Some(metadata) = entry.metadata else {
                debug!(
                    "Skipping {}/{}/{}: no metadata",
                    entry.channel, entry.package, entry.version
                );
                continue;
            };

            let version = parse_version(&entry.version)?;
            inventory
                .buckets
                .entry(BucketKey::new(entry.package, entry.channel))
                .or_default()
                .insert(version, metadata);
        }

        Ok(inventory)
    }

    /// Versions held for a (package, channel) pair, if any
    pub fn versions(&self, package: &str, channel: &str) -> Option<&VersionMap> {
        self.buckets.get(&BucketKey::new(package, channel))
    }

    /// Version set of a (package, channel) pair; empty when absent
    pub fn version_set(&self, package: &str, channel: &str) -> BTreeSet<Version> {
        self.versions(package, channel)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn metadata(&self, package: &str, channel: &str, version: &Version) -> Option<&Metadata> {
        self.versions(package, channel)?.get(version)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &VersionMap)> {
        self.buckets.iter()
    }

    /// Total number of versions across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(BTreeMap::is_empty)
    }
}
