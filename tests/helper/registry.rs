//! Registry test utilities

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;

use package_tracker::version::error::RegistryError;
use package_tracker::version::registry::Registry;
use package_tracker::version::types::RegistryHit;

/// In-memory registry serving fixed versions per package
#[derive(Default)]
pub struct StaticRegistry {
    versions: HashMap<String, Vec<String>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, package: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            package.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl Registry for StaticRegistry {
    async fn search(&self, package_name: &str) -> Result<Vec<RegistryHit>, RegistryError> {
        match self.versions.get(package_name) {
            Some(versions) => Ok(versions
                .iter()
                .map(|version| RegistryHit {
                    name: package_name.to_string(),
                    version: version.clone(),
                    metadata: json!({"name": package_name, "version": version}),
                })
                .collect()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}

/// JSON body of a registry search response
pub fn search_body(package: &str, versions: &[&str]) -> String {
    let hits: Vec<_> = versions
        .iter()
        .map(|version| json!({"name": package, "version": version, "type": "integration"}))
        .collect();
    serde_json::Value::Array(hits).to_string()
}
