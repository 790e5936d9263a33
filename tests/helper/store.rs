//! Asset store test utilities

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use package_tracker::version::types::SourceEntry;

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Create an asset-layout store. Versions named with a trailing `!` get a
/// directory but no metadata file.
pub fn create_asset_store(assets: &[(&str, &str, &[&str])]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (channel, package, versions) in assets {
        for version in *versions {
            let dir = temp_dir.path().join(channel).join(package);
            match version.strip_suffix('!') {
                Some(version) => std::fs::create_dir_all(dir.join(version)).unwrap(),
                None => write(
                    &dir.join(version).join("meta.yml"),
                    &format!("channel: {}\n", channel),
                ),
            }
        }
    }
    temp_dir
}

/// Create a package-layout store
pub fn create_package_store(packages: &[(&str, &str, &[&str])]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (channel, package, versions) in packages {
        for version in *versions {
            write(
                &temp_dir
                    .path()
                    .join(channel)
                    .join("packages")
                    .join(package)
                    .join(version)
                    .join("manifest.yml"),
                &format!("name: {}\nversion: '{}'\n", package, version),
            );
        }
    }
    temp_dir
}

/// Source entries with metadata for one (channel, package)
pub fn entries(channel: &str, package: &str, versions: &[&str]) -> Vec<SourceEntry> {
    versions
        .iter()
        .map(|version| SourceEntry::new(channel, package, *version, Some(json!({}))))
        .collect()
}
