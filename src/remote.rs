//! Remote inventory source backed by per-channel package registries

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use indexmap::IndexMap;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::{FETCH_STAGGER_DELAY_MS, RegistriesConfig};
use crate::tracking::policy::TrackingPolicy;
use crate::version::error::RegistryError;
use crate::version::registries::EprRegistry;
use crate::version::registry::Registry;
use crate::version::types::SourceEntry;

/// The registry publishing each channel
#[derive(Clone, Default)]
pub struct ChannelRegistries {
    registries: IndexMap<String, Arc<dyn Registry>>,
}

impl ChannelRegistries {
    /// Create registries for the given channels from configuration.
    ///
    /// Fails if a channel has neither a configured nor a default URL.
    pub fn from_config(
        config: &RegistriesConfig,
        channels: &[String],
    ) -> Result<Self, RegistryError> {
        let mut registries = Self::default();
        for channel in channels {
            let url = config
                .url_for(channel)
                .ok_or_else(|| RegistryError::NotConfigured(channel.clone()))?;
            debug!("Using registry {} for channel {}", url, channel);
            registries.insert(channel.clone(), Arc::new(EprRegistry::new(url)));
        }
        Ok(registries)
    }

    pub fn insert(&mut self, channel: impl Into<String>, registry: Arc<dyn Registry>) {
        self.registries.insert(channel.into(), registry);
    }

    pub fn get(&self, channel: &str) -> Option<&Arc<dyn Registry>> {
        self.registries.get(channel)
    }
}

/// Search every tracked (package, channel) pair.
///
/// Requests run concurrently with staggered starts. A package the registry
/// does not know yields no entries; any other failure fails the whole fetch.
pub async fn fetch_remote_entries(
    policy: &TrackingPolicy,
    registries: &ChannelRegistries,
) -> Result<Vec<SourceEntry>, RegistryError> {
    let mut targets = Vec::new();
    for (package, package_policy) in policy.iter() {
        for channel in &package_policy.channels {
            let registry = registries
                .get(channel)
                .ok_or_else(|| RegistryError::NotConfigured(channel.clone()))?;
            targets.push((package, channel.as_str(), Arc::clone(registry)));
        }
    }

    let futures = targets
        .into_iter()
        .enumerate()
        .map(|(i, (package, channel, registry))| {
            let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
            async move {
                sleep(delay).await;
                debug!("Searching {}/{}", channel, package);
                let hits = match registry.search(package).await {
                    Ok(hits) => hits,
                    Err(RegistryError::NotFound(_)) => {
                        debug!("{} is not published in {}", package, channel);
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                };
                Ok(hits
                    .into_iter()
                    .map(|hit| SourceEntry::new(channel, hit.name, hit.version, Some(hit.metadata)))
                    .collect::<Vec<_>>())
            }
        });

    let mut entries = Vec::new();
    for result in join_all(futures).await {
        entries.extend(result?);
    }

    info!("Fetched {} remote versions", entries.len());
    Ok(entries)
}
