//! Package registry search API implementation

use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::{Metadata, RegistryHit};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default base URL for the production channel registry
pub const DEFAULT_BASE_URL: &str = "https://epr.elastic.co";

/// One entry of a search response
#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    version: String,
}

/// Registry implementation for the package registry search API
pub struct EprRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl EprRegistry {
    /// Creates a new EprRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("package-tracker")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for EprRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for EprRegistry {
    async fn search(&self, package_name: &str) -> Result<Vec<RegistryHit>, RegistryError> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("all", "1"), ("package", package_name)],
        )
        .map_err(|e| RegistryError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("Registry returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let results: Vec<Metadata> = response.json().await.map_err(|e| {
            warn!("Failed to parse registry search response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let mut hits = Vec::with_capacity(results.len());
        for metadata in results {
            let result = SearchResult::deserialize(&metadata).map_err(|e| {
                RegistryError::InvalidResponse(format!("Malformed search result: {}", e))
            })?;

            // The search endpoint matches loosely, only keep exact names
            if result.name != package_name {
                debug!("Ignoring search hit for {}", result.name);
                continue;
            }

            hits.push(RegistryHit {
                name: result.name,
                version: result.version,
                metadata,
            });
        }

        Ok(hits)
    }
}
