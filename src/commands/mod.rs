//! Subcommands of the `package-tracker` binary
//!
//! Each command takes the loaded [`Config`] and writes its report to the
//! given writer, so they can be driven from tests as well as from `main`.

pub mod diff;
pub mod meta;
pub mod update;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::remote::{ChannelRegistries, fetch_remote_entries};
use crate::store::{AssetStore, StoreLayout};
use crate::tracking::{Inventory, ReconciliationResult, TrackingPolicy, reconcile};

pub use diff::DiffArgs;
pub use meta::MetaArgs;
pub use update::UpdateArgs;

/// Build both inventories and reconcile them under the configured policy.
///
/// The remote side is the package store at `remote_store` when given,
/// otherwise the registries configured per channel.
pub async fn reconcile_config(
    config: &Config,
    remote_store: Option<&Path>,
) -> Result<Vec<ReconciliationResult>> {
    let policy = config
        .tracking_policy()
        .context("Invalid tracked-packages configuration")?;
    if policy.is_empty() {
        warn!("No packages are tracked");
        return Ok(Vec::new());
    }

    let local = local_inventory(config, &policy)?;
    let remote = remote_inventory(config, &policy, remote_store).await?;
    info!(
        "Reconciling {} local and {} remote versions",
        local.len(),
        remote.len()
    );

    Ok(reconcile(&policy, &local, &remote))
}

fn local_inventory(config: &Config, policy: &TrackingPolicy) -> Result<Inventory> {
    let store = AssetStore::new(&config.assets_dir, StoreLayout::Assets);
    let walk = store
        .walk(&policy.channels())
        .with_context(|| format!("Failed to scan assets in {:?}", store.root()))?;
    Inventory::try_from_entries(walk).context("Failed to build local inventory")
}

async fn remote_inventory(
    config: &Config,
    policy: &TrackingPolicy,
    remote_store: Option<&Path>,
) -> Result<Inventory> {
    match remote_store {
        Some(dir) => {
            let store = AssetStore::new(dir, StoreLayout::Packages);
            let walk = store
                .walk(&policy.channels())
                .with_context(|| format!("Failed to scan packages in {:?}", dir))?;
            Inventory::try_from_entries(walk).context("Failed to build remote inventory")
        }
        None => {
            let registries = ChannelRegistries::from_config(&config.registries, &policy.channels())?;
            let entries = fetch_remote_entries(policy, &registries)
                .await
                .context("Failed to query registries")?;
            Inventory::from_entries(entries).context("Failed to build remote inventory")
        }
    }
}
