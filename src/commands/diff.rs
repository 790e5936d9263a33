//! `package-tracker diff`: show how local assets differ from the remote.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::commands::reconcile_config;
use crate::config::Config;
use crate::tracking::diff::render_report;

/// Arguments for `package-tracker diff`.
#[derive(Args, Debug, Default)]
pub struct DiffArgs {
    /// Compare against a synced package store instead of the registries.
    #[arg(long, value_name = "DIR")]
    pub remote_store: Option<PathBuf>,

    /// Also print channels where local and remote agree.
    #[arg(long)]
    pub all: bool,
}

impl DiffArgs {
    pub async fn run(&self, config: &Config, out: &mut impl Write) -> Result<()> {
        let results = reconcile_config(config, self.remote_store.as_deref()).await?;
        out.write_all(render_report(&results, self.all).as_bytes())?;
        Ok(())
    }
}
