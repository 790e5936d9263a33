//! Common types shared by registries and inventory sources

/// Opaque metadata attached to a package version.
///
/// Local metadata files are YAML and registry hits are JSON; both are carried
/// as a JSON value since the engine never looks inside.
pub type Metadata = serde_json::Value;

/// One published version returned by a registry search
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryHit {
    pub name: String,
    pub version: String,
    /// The full search result object
    pub metadata: Metadata,
}

/// A single `(channel, package, version, metadata)` observation from an
/// inventory source.
///
/// `metadata` is `None` when the version exists in the source but carries no
/// finalized metadata yet.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub channel: String,
    pub package: String,
    pub version: String,
    pub metadata: Option<Metadata>,
}

impl SourceEntry {
    pub fn new(
        channel: impl Into<String>,
        package: impl Into<String>,
        version: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            channel: channel.into(),
            package: package.into(),
            version: version.into(),
            metadata,
        }
    }
}
