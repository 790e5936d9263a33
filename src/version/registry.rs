//! Registry trait for querying published package versions

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::RegistryHit;

/// Trait for searching a package registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Searches all published versions of a package
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "endpoint")
    ///
    /// # Returns
    /// * `Ok(Vec<RegistryHit>)` - Every published version, in registry order
    /// * `Err(RegistryError)` - If the query fails
    async fn search(&self, package_name: &str) -> Result<Vec<RegistryHit>, RegistryError>;
}
