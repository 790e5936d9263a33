use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::store::error::{StoreError, io_err};
use crate::version::types::{Metadata, SourceEntry};

/// A version directory found by [`AssetStore::walk`](super::AssetStore::walk)
#[derive(Debug)]
pub(super) struct Pending {
    pub channel: String,
    pub package: String,
    pub version: String,
    pub metadata_path: PathBuf,
}

/// Iterator over the entries of an asset store.
///
/// Yields one [`SourceEntry`] per version directory, reading its metadata
/// file on demand. Restart a walk by calling `walk` again.
#[derive(Debug)]
pub struct StoreWalk {
    pending: std::vec::IntoIter<Pending>,
    strict: bool,
}

impl StoreWalk {
    pub(super) fn new(pending: Vec<Pending>) -> Self {
        Self {
            pending: pending.into_iter(),
            strict: false,
        }
    }

    /// Report version directories without metadata as
    /// [`StoreError::MissingMetadata`] instead of yielding them with no metadata
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl Iterator for StoreWalk {
    type Item = Result<SourceEntry, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pending = self.pending.next()?;
        Some(read_entry(pending, self.strict))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}

fn read_entry(pending: Pending, strict: bool) -> Result<SourceEntry, StoreError> {
    let metadata = read_metadata(&pending.metadata_path)?;

    if metadata.is_none() && strict {
        return Err(StoreError::MissingMetadata {
            channel: pending.channel,
            package: pending.package,
            version: pending.version,
        });
    }

    Ok(SourceEntry {
        channel: pending.channel,
        package: pending.package,
        version: pending.version,
        metadata,
    })
}

fn read_metadata(path: &Path) -> Result<Option<Metadata>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(path, err)),
    };

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Metadata {
            path: path.to_path_buf(),
            source,
        })
}
