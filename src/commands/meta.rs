//! `package-tracker meta`: list local assets with their metadata.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::config::Config;
use crate::store::{AssetStore, StoreLayout};

/// Arguments for `package-tracker meta`.
#[derive(Args, Debug, Default)]
pub struct MetaArgs {
    /// Fail if an asset directory has no metadata.
    #[arg(long)]
    pub pedantic: bool,
}

impl MetaArgs {
    /// Print one JSON object per asset version that has metadata.
    pub fn run(&self, config: &Config, out: &mut impl Write) -> Result<()> {
        let store = AssetStore::new(&config.assets_dir, StoreLayout::Assets);
        let mut walk = store
            .walk_all()
            .with_context(|| format!("Failed to scan assets in {:?}", store.root()))?;
        if self.pedantic {
            walk = walk.strict();
        }

        for entry in walk {
            let entry = entry?;
            let Some(meta) = entry.metadata else {
                continue;
            };
            let line = json!({
                "channel": entry.channel,
                "package": entry.package,
                "version": entry.version,
                "meta": meta,
            });
            writeln!(out, "{}", line)?;
        }

        Ok(())
    }
}
