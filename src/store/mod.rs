//! On-disk asset store
//!
//! # Layouts
//!
//! ```text
//! assets/                              packages/
//!   <channel>/                           <channel>/
//!     <package>/                           packages/
//!       <version>/                           <package>/
//!         meta.yml                             <version>/
//!                                                manifest.yml
//! ```
//!
//! The asset layout is the local store this tool keeps up to date; the
//! package layout is a separately synced mirror of published packages that
//! can stand in for the remote registry.

mod error;
mod walk;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::StoreError;
pub use walk::StoreWalk;

use error::io_err;

/// Directory structure of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLayout {
    /// `<channel>/<package>/<version>/meta.yml`
    Assets,
    /// `<channel>/packages/<package>/<version>/manifest.yml`
    Packages,
}

impl StoreLayout {
    fn metadata_file(self) -> &'static str {
        match self {
            StoreLayout::Assets => "meta.yml",
            StoreLayout::Packages => "manifest.yml",
        }
    }
}

/// Metadata recorded after installing a version into the asset store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocalMeta {
    pub channel: String,
    pub package: String,
    pub version: String,
    /// Platform version reported by the installer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    pub installed_at: DateTime<Utc>,
}

/// A directory tree of `(channel, package, version)` entries
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
    layout: StoreLayout,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, layout: StoreLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> StoreLayout {
        self.layout
    }

    /// Directory holding the packages of a channel
    pub fn channel_dir(&self, channel: &str) -> PathBuf {
        match self.layout {
            StoreLayout::Assets => self.root.join(channel),
            StoreLayout::Packages => self.root.join(channel).join("packages"),
        }
    }

    pub fn version_dir(&self, channel: &str, package: &str, version: &str) -> PathBuf {
        self.channel_dir(channel).join(package).join(version)
    }

    pub fn metadata_path(&self, channel: &str, package: &str, version: &str) -> PathBuf {
        self.version_dir(channel, package, version)
            .join(self.layout.metadata_file())
    }

    /// Channel directories present in the store, sorted by name
    pub fn channels(&self) -> Result<Vec<String>, StoreError> {
        list_dirs(&self.root)
    }

    /// Walk the given channels.
    ///
    /// Directory listings are taken eagerly and sorted; metadata files are
    /// read as the walk advances. Channels without a directory contribute
    /// nothing.
    pub fn walk(&self, channels: &[String]) -> Result<StoreWalk, StoreError> {
        let mut pending = Vec::new();

        for channel in channels {
            let channel_dir = self.channel_dir(channel);
            for package in list_dirs(&channel_dir)? {
                for version in list_dirs(&channel_dir.join(&package))? {
                    let metadata_path = self.metadata_path(channel, &package, &version);
                    pending.push(walk::Pending {
                        channel: channel.clone(),
                        package: package.clone(),
                        version,
                        metadata_path,
                    });
                }
            }
        }

        debug!(
            "Found {} version directories under {:?}",
            pending.len(),
            self.root
        );

        Ok(StoreWalk::new(pending))
    }

    /// Walk every channel directory present in the store
    pub fn walk_all(&self) -> Result<StoreWalk, StoreError> {
        self.walk(&self.channels()?)
    }

    /// Create the directory a version is installed into
    pub fn create_version_dir(
        &self,
        channel: &str,
        package: &str,
        version: &str,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.version_dir(channel, package, version);
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        Ok(dir)
    }

    /// Remove a version directory and everything in it
    pub fn remove_version_dir(
        &self,
        channel: &str,
        package: &str,
        version: &str,
    ) -> Result<(), StoreError> {
        let dir = self.version_dir(channel, package, version);
        std::fs::remove_dir_all(&dir).map_err(|e| io_err(&dir, e))
    }

    /// Write metadata for an installed version.
    ///
    /// Writes to `<file>.tmp` then renames, so a partially written file is
    /// never picked up as finalized metadata.
    pub fn write_meta(&self, meta: &LocalMeta) -> Result<PathBuf, StoreError> {
        let dir = self.create_version_dir(&meta.channel, &meta.package, &meta.version)?;
        let path = dir.join(self.layout.metadata_file());
        let tmp_path = dir.join(format!("{}.tmp", self.layout.metadata_file()));

        let content = serde_yaml::to_string(meta).map_err(|source| StoreError::Metadata {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&tmp_path, content).map_err(|e| io_err(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| io_err(&path, e))?;

        debug!("Wrote metadata {:?}", path);
        Ok(path)
    }
}

/// Names of the visible subdirectories of `dir`, sorted; empty if `dir` is missing
fn list_dirs(dir: &Path) -> Result<Vec<String>, StoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_err(dir, err)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();

    Ok(names)
}
