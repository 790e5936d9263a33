use thiserror::Error;

/// A version string that does not parse as a semantic version.
#[derive(Debug, Error)]
#[error("Invalid version {input:?}: {source}")]
pub struct InvalidVersionError {
    pub input: String,
    #[source]
    pub source: semver::Error,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid registry URL {0}")]
    InvalidUrl(String),

    #[error("No registry configured for channel {0}")]
    NotConfigured(String),
}
