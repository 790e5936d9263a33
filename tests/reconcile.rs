//! Reconciliation scenarios and properties

mod helper;

use std::collections::BTreeSet;

use proptest::prelude::*;
use semver::Version;

use helper::entries;
use package_tracker::tracking::diff::render;
use package_tracker::tracking::{
    FloorMode, Inventory, PackagePolicy, ReconciliationResult, TrackingPolicy, reconcile,
};
use package_tracker::version::types::SourceEntry;

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn set(versions: &[&str]) -> BTreeSet<Version> {
    versions.iter().map(|s| v(s)).collect()
}

fn policy(floor: Option<&str>) -> TrackingPolicy {
    let mut package = PackagePolicy::default().with_channels(["production"]);
    if let Some(floor) = floor {
        package = package.with_minimum_version(v(floor));
    }
    TrackingPolicy::from_iter([("p", package)])
}

fn run(floor: Option<&str>, local: &[&str], remote: &[&str]) -> ReconciliationResult {
    let local = Inventory::from_entries(entries("production", "p", local)).unwrap();
    let remote = Inventory::from_entries(entries("production", "p", remote)).unwrap();
    let mut results = reconcile(&policy(floor), &local, &remote);
    assert_eq!(results.len(), 1);
    results.remove(0)
}

#[test]
fn newer_remote_version_is_reported_missing() {
    let result = run(None, &["1.0.0"], &["1.0.0", "1.1.0"]);

    assert_eq!(result.only_remote, set(&["1.1.0"]));
    assert!(result.only_local.is_empty());
    assert_eq!(&render(&result)[3..], &[" 1.0.0", "-1.1.0"]);
}

#[test]
fn version_dropped_remotely_is_reported_local_only() {
    let result = run(None, &["1.0.0", "2.0.0"], &["2.0.0"]);

    assert_eq!(result.only_local, set(&["1.0.0"]));
    assert!(result.only_remote.is_empty());
    assert_eq!(&render(&result)[3..], &["+1.0.0", " 2.0.0"]);
}

#[test]
fn floor_keeps_versions_adopted_before_it() {
    let result = run(Some("1.5.0"), &["1.0.0"], &["1.0.0", "2.0.0"]);

    assert_eq!(result.only_remote, set(&["2.0.0"]));
    assert!(result.only_local.is_empty());
    assert_eq!(result.all_versions, set(&["1.0.0", "2.0.0"]));
}

#[test]
fn raised_floor_does_not_evict_adopted_version() {
    let result = run(Some("2.0.0"), &["1.5.0"], &["1.5.0", "2.0.0"]);

    assert!(!result.only_local.contains(&v("1.5.0")));
    assert_eq!(result.only_remote, set(&["2.0.0"]));
}

#[test]
fn strict_floor_mode_reports_adopted_version_as_local_only() {
    let policy = TrackingPolicy::from_iter([(
        "p",
        PackagePolicy::default()
            .with_channels(["production"])
            .with_minimum_version(v("2.0.0"))
            .with_floor_mode(FloorMode::Strict),
    )]);
    let local = Inventory::from_entries(entries("production", "p", &["1.5.0"])).unwrap();
    let remote = Inventory::from_entries(entries("production", "p", &["1.5.0", "2.0.0"])).unwrap();

    let results = reconcile(&policy, &local, &remote);

    assert_eq!(results[0].only_local, set(&["1.5.0"]));
}

#[test]
fn malformed_version_fails_before_reconciliation() {
    let mut local = entries("production", "p", &["1.0.0"]);
    local.push(SourceEntry::new(
        "production",
        "p",
        "v1.oops",
        Some(serde_json::json!({})),
    ));

    let err = Inventory::from_entries(local).unwrap_err();

    assert_eq!(err.input, "v1.oops");
}

#[test]
fn bare_package_name_tracks_default_channels_without_floor() {
    let policy = TrackingPolicy::resolve(&serde_yaml::from_str("p").unwrap()).unwrap();

    let package = policy.get("p").unwrap();
    assert_eq!(package.channels, vec!["production", "staging", "snapshot"]);
    assert_eq!(package.minimum_version, None);
}

fn version_strategy() -> impl Strategy<Value = String> {
    (0u64..4, 0u64..12, 0u64..4, proptest::option::of(0u8..3)).prop_map(
        |(major, minor, patch, pre)| match pre {
            Some(pre) => format!("{}.{}.{}-rc.{}", major, minor, patch, pre),
            None => format!("{}.{}.{}", major, minor, patch),
        },
    )
}

fn versions_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(version_strategy(), 0..12)
}

fn inventory(versions: &[String]) -> Inventory {
    let refs: Vec<&str> = versions.iter().map(String::as_str).collect();
    Inventory::from_entries(entries("production", "p", &refs)).unwrap()
}

proptest! {
    #[test]
    fn result_sets_partition_all_versions(
        local in versions_strategy(),
        remote in versions_strategy(),
        floor in proptest::option::of(version_strategy()),
    ) {
        let results = reconcile(&policy(floor.as_deref()), &inventory(&local), &inventory(&remote));
        let result = &results[0];

        prop_assert!(result.only_local.is_disjoint(&result.only_remote));

        let both: BTreeSet<Version> = result.in_both().cloned().collect();
        let union: BTreeSet<Version> = result
            .only_local
            .union(&result.only_remote)
            .chain(both.iter())
            .cloned()
            .collect();
        prop_assert_eq!(&union, &result.all_versions);

        // everything held locally is accounted for
        let local_set: BTreeSet<Version> = local.iter().map(|s| v(s)).collect();
        prop_assert!(local_set.is_subset(&result.all_versions));
    }

    #[test]
    fn reconciliation_is_idempotent(
        local in versions_strategy(),
        remote in versions_strategy(),
        floor in proptest::option::of(version_strategy()),
    ) {
        let policy = policy(floor.as_deref());
        let local = inventory(&local);
        let remote = inventory(&remote);

        prop_assert_eq!(
            reconcile(&policy, &local, &remote),
            reconcile(&policy, &local, &remote)
        );
    }

    #[test]
    fn rendered_versions_are_strictly_ascending(
        local in versions_strategy(),
        mut remote in versions_strategy(),
    ) {
        let forward = run_owned(&local, &remote);
        remote.reverse();
        let reversed = run_owned(&local, &remote);

        let lines = render(&forward);
        let rendered: Vec<Version> = lines[3..].iter().map(|line| v(&line[1..])).collect();
        prop_assert!(rendered.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(lines, render(&reversed));
    }
}

fn run_owned(local: &[String], remote: &[String]) -> ReconciliationResult {
    reconcile(&policy(None), &inventory(local), &inventory(remote)).remove(0)
}
