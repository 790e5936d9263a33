//! `package-tracker update`: install versions published remotely but missing locally.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::commands::reconcile_config;
use crate::config::Config;
use crate::store::{AssetStore, StoreLayout};
use crate::update::{Installer, ProcessInstaller, plan, run_update};

/// Arguments for `package-tracker update`.
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Compare against a synced package store instead of the registries.
    #[arg(long, value_name = "DIR")]
    pub remote_store: Option<PathBuf>,

    /// Show what would be installed without running the installer.
    #[arg(long)]
    pub dry_run: bool,
}

impl UpdateArgs {
    pub async fn run(&self, config: &Config, out: &mut impl Write) -> Result<()> {
        if self.dry_run {
            let results = reconcile_config(config, self.remote_store.as_deref()).await?;
            for install in plan(&results) {
                writeln!(out, "[dry-run] would install {}", install)?;
            }
            return Ok(());
        }

        let installer = ProcessInstaller::from_config(&config.installer)
            .context("No installer command configured")?;
        self.run_with(config, &installer, out).await
    }

    /// Run the update with an explicit installer
    pub async fn run_with<I: Installer + ?Sized>(
        &self,
        config: &Config,
        installer: &I,
        out: &mut impl Write,
    ) -> Result<()> {
        let results = reconcile_config(config, self.remote_store.as_deref()).await?;
        let store = AssetStore::new(&config.assets_dir, StoreLayout::Assets);

        let summary = run_update(&results, &store, installer).await;
        for install in &summary.installed {
            writeln!(out, "installed {}", install)?;
        }
        for failure in &summary.failed {
            writeln!(out, "failed {}: {}", failure.install, failure.reason)?;
        }

        if !summary.is_success() {
            bail!("{} versions failed to install", summary.failed.len());
        }
        Ok(())
    }
}
