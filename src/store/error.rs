use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::InvalidVersionError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metadata at {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing metadata for {channel}/{package}/{version}")]
    MissingMetadata {
        channel: String,
        package: String,
        version: String,
    },

    #[error(transparent)]
    InvalidVersion(#[from] InvalidVersionError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
