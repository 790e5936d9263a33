//! Package version tracking across release channels.
//!
//! Compares the versions held in a local asset store against what remote
//! registries publish, per package and channel, and reports or installs the
//! difference.
//!
//! - [`tracking`]: policy, inventories, reconciliation and diff rendering
//! - [`version`]: version ordering and registry access
//! - [`store`]: the on-disk asset store
//! - [`remote`]: remote inventories from per-channel registries
//! - [`update`]: installer-driven updates
//! - [`commands`]: subcommands of the binary

pub mod commands;
pub mod config;
pub mod logging;
pub mod remote;
pub mod store;
pub mod tracking;
pub mod update;
pub mod version;
