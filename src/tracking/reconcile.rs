//! Reconciliation of a local inventory against a remote one

use std::collections::BTreeSet;

use semver::Version;
use tracing::debug;

use crate::tracking::inventory::Inventory;
use crate::tracking::policy::{FloorMode, PackagePolicy, TrackingPolicy};
use crate::version::semver::meets_floor;

/// Where a version of a reconciled (package, channel) pair lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    /// Published remotely, missing locally
    OnlyRemote,
    /// Held locally, not published remotely
    OnlyLocal,
    Both,
}

/// Version delta of one (package, channel) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub package: String,
    pub channel: String,
    pub all_versions: BTreeSet<Version>,
    pub only_local: BTreeSet<Version>,
    pub only_remote: BTreeSet<Version>,
}

impl ReconciliationResult {
    /// Compute the delta between a local and an already floor-filtered remote set
    pub fn new(
        package: impl Into<String>,
        channel: impl Into<String>,
        local: &BTreeSet<Version>,
        remote: &BTreeSet<Version>,
    ) -> Self {
        Self {
            package: package.into(),
            channel: channel.into(),
            all_versions: local.union(remote).cloned().collect(),
            only_local: local.difference(remote).cloned().collect(),
            only_remote: remote.difference(local).cloned().collect(),
        }
    }

    /// Versions present on both sides
    pub fn in_both(&self) -> impl Iterator<Item = &Version> {
        self.all_versions
            .iter()
            .filter(|v| !self.only_local.contains(*v) && !self.only_remote.contains(*v))
    }

    pub fn state_of(&self, version: &Version) -> Option<VersionState> {
        if self.only_remote.contains(version) {
            Some(VersionState::OnlyRemote)
        } else if self.only_local.contains(version) {
            Some(VersionState::OnlyLocal)
        } else if self.all_versions.contains(version) {
            Some(VersionState::Both)
        } else {
            None
        }
    }

    /// Every version in ascending order, tagged with where it lives
    pub fn walk(&self) -> impl Iterator<Item = (&Version, VersionState)> {
        self.all_versions
            .iter()
            .filter_map(|v| self.state_of(v).map(|state| (v, state)))
    }

    /// True when local and remote agree
    pub fn is_noop(&self) -> bool {
        self.only_local.is_empty() && self.only_remote.is_empty()
    }
}

/// Reconcile every tracked (package, channel) pair.
///
/// Results follow the policy's package and channel order, and one is emitted
/// per pair even when it carries no delta.
pub fn reconcile(
    policy: &TrackingPolicy,
    local: &Inventory,
    remote: &Inventory,
) -> Vec<ReconciliationResult> {
    let mut results = Vec::new();

    for (package, package_policy) in policy.iter() {
        for channel in &package_policy.channels {
            let local_versions = local.version_set(package, channel);
            let remote_versions = apply_floor(
                package_policy,
                remote.version_set(package, channel),
                &local_versions,
            );

            let result =
                ReconciliationResult::new(package, channel, &local_versions, &remote_versions);
            debug!(
                "Reconciled {}/{}: {} versions, {} only remote, {} only local",
                package,
                channel,
                result.all_versions.len(),
                result.only_remote.len(),
                result.only_local.len()
            );
            results.push(result);
        }
    }

    results
}

fn apply_floor(
    policy: &PackagePolicy,
    remote: BTreeSet<Version>,
    local: &BTreeSet<Version>,
) -> BTreeSet<Version> {
    let Some(floor) = &policy.minimum_version else {
        return remote;
    };

    remote
        .into_iter()
        .filter(|v| {
            meets_floor(v, floor)
                || (policy.floor_mode == FloorMode::RetainAdopted && local.contains(v))
        })
        .collect()
}
