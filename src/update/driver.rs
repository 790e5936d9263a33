//! Installs versions missing from the local asset store

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::store::{AssetStore, LocalMeta};
use crate::tracking::reconcile::ReconciliationResult;
use crate::update::installer::{InstallRequest, Installer};

/// A version the driver will install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstall {
    pub package: String,
    pub channel: String,
    pub version: String,
}

impl std::fmt::Display for PlannedInstall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.channel, self.package, self.version)
    }
}

/// A version that could not be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedInstall {
    pub install: PlannedInstall,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub installed: Vec<PlannedInstall>,
    pub failed: Vec<FailedInstall>,
}

impl UpdateSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Every remote-only version, grouped by result and ascending within each
pub fn plan(results: &[ReconciliationResult]) -> Vec<PlannedInstall> {
    results
        .iter()
        .flat_map(|result| {
            result.only_remote.iter().map(|version| PlannedInstall {
                package: result.package.clone(),
                channel: result.channel.clone(),
                version: version.to_string(),
            })
        })
        .collect()
}

/// Install every remote-only version and record its metadata.
///
/// A failed version is reported and skipped; the remaining versions are
/// still attempted.
pub async fn run_update<I: Installer + ?Sized>(
    results: &[ReconciliationResult],
    store: &AssetStore,
    installer: &I,
) -> UpdateSummary {
    let mut summary = UpdateSummary::default();

    for install in plan(results) {
        info!("Installing {}", install);
        match install_one(&install, store, installer).await {
            Ok(()) => summary.installed.push(install),
            Err(reason) => {
                error!("Failed to install {}: {}", install, reason);
                summary.failed.push(FailedInstall { install, reason });
            }
        }
    }

    info!(
        "Installed {} versions, {} failed",
        summary.installed.len(),
        summary.failed.len()
    );
    summary
}

/// Install one version, removing its directory again on failure if this
/// call created it
async fn install_one<I: Installer + ?Sized>(
    install: &PlannedInstall,
    store: &AssetStore,
    installer: &I,
) -> Result<(), String> {
    let existed = store
        .version_dir(&install.channel, &install.package, &install.version)
        .exists();
    let dest = store
        .create_version_dir(&install.channel, &install.package, &install.version)
        .map_err(|e| e.to_string())?;

    let result = install_into(install, dest, store, installer).await;

    if result.is_err() && !existed {
        debug!("Removing partial install of {}", install);
        if let Err(e) =
            store.remove_version_dir(&install.channel, &install.package, &install.version)
        {
            warn!("Failed to clean up {}: {}", install, e);
        }
    }
    result
}

async fn install_into<I: Installer + ?Sized>(
    install: &PlannedInstall,
    dest: PathBuf,
    store: &AssetStore,
    installer: &I,
) -> Result<(), String> {
    let request = InstallRequest {
        package: install.package.clone(),
        channel: install.channel.clone(),
        version: install.version.clone(),
        dest,
    };
    let report = installer
        .install(&request)
        .await
        .map_err(|e| e.to_string())?;

    store
        .write_meta(&LocalMeta {
            channel: install.channel.clone(),
            package: install.package.clone(),
            version: install.version.clone(),
            platform_version: report.platform_version,
            installed_at: Utc::now(),
        })
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreLayout;
    use crate::update::installer::{InstallError, InstallReport, MockInstaller};
    use semver::Version;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn set(versions: &[&str]) -> BTreeSet<Version> {
        versions.iter().map(|s| Version::parse(s).unwrap()).collect()
    }

    fn results() -> Vec<ReconciliationResult> {
        vec![
            ReconciliationResult::new(
                "endpoint",
                "production",
                &set(&["8.2.0"]),
                &set(&["8.2.0", "8.10.0", "8.3.0"]),
            ),
            ReconciliationResult::new("endpoint", "staging", &set(&["8.4.0"]), &set(&["8.4.0"])),
        ]
    }

    #[test]
    fn plan_lists_remote_only_versions_ascending() {
        let planned: Vec<String> = plan(&results()).iter().map(|p| p.to_string()).collect();

        assert_eq!(
            planned,
            vec!["production/endpoint/8.3.0", "production/endpoint/8.10.0"]
        );
    }

    #[tokio::test]
    async fn run_update_installs_and_records_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let store = AssetStore::new(temp_dir.path(), StoreLayout::Assets);

        let mut installer = MockInstaller::new();
        installer.expect_install().times(2).returning(|request| {
            assert!(request.dest.is_dir());
            Ok(InstallReport {
                platform_version: Some("8.11.0".to_string()),
            })
        });

        let summary = run_update(&results(), &store, &installer).await;

        assert!(summary.is_success());
        assert_eq!(summary.installed.len(), 2);
        let meta = std::fs::read_to_string(store.metadata_path("production", "endpoint", "8.10.0"))
            .unwrap();
        let meta: LocalMeta = serde_yaml::from_str(&meta).unwrap();
        assert_eq!(meta.platform_version, Some("8.11.0".to_string()));
        assert_eq!(meta.version, "8.10.0");
    }

    #[tokio::test]
    async fn run_update_skips_failed_versions_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        let store = AssetStore::new(temp_dir.path(), StoreLayout::Assets);

        let mut installer = MockInstaller::new();
        installer.expect_install().times(2).returning(|request| {
            if request.version == "8.3.0" {
                Err(InstallError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "boom".to_string(),
                })
            } else {
                Ok(InstallReport::default())
            }
        });

        let summary = run_update(&results(), &store, &installer).await;

        assert!(!summary.is_success());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].install.version, "8.3.0");
        assert!(summary.failed[0].reason.contains("boom"));
        assert_eq!(summary.installed[0].version, "8.10.0");
        assert!(!store.version_dir("production", "endpoint", "8.3.0").exists());
        assert!(store.metadata_path("production", "endpoint", "8.10.0").exists());
    }

    #[tokio::test]
    async fn run_update_keeps_existing_directory_when_install_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = AssetStore::new(temp_dir.path(), StoreLayout::Assets);
        let existing = store
            .create_version_dir("production", "endpoint", "8.3.0")
            .unwrap();
        std::fs::write(existing.join("notes.txt"), "kept").unwrap();

        let mut installer = MockInstaller::new();
        installer.expect_install().returning(|request| {
            if request.version == "8.3.0" {
                Err(InstallError::TimedOut(std::time::Duration::from_secs(1)))
            } else {
                Ok(InstallReport::default())
            }
        });

        let summary = run_update(&results(), &store, &installer).await;

        assert_eq!(summary.failed.len(), 1);
        assert!(existing.join("notes.txt").exists());
    }

    #[tokio::test]
    async fn run_update_does_nothing_without_remote_only_versions() {
        let temp_dir = TempDir::new().unwrap();
        let store = AssetStore::new(temp_dir.path(), StoreLayout::Assets);
        let mut installer = MockInstaller::new();
        installer.expect_install().never();

        let summary = run_update(&results()[1..], &store, &installer).await;

        assert_eq!(summary, UpdateSummary::default());
    }
}
