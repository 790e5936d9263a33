//! Version-set reconciliation between a local asset store and remote sources
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Policy    │────▶│  Reconcile  │────▶│    Diff     │
//! │  (config)   │     │ (set delta) │     │  (render)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲
//!                     ┌─────────────┐
//!                     │  Inventory  │
//!                     │  (sources)  │
//!                     └─────────────┘
//! ```
//!
//! - [`policy`]: Resolves `tracked-packages` configuration into a [`TrackingPolicy`]
//! - [`inventory`]: Groups source entries by (package, channel)
//! - [`reconcile`]: Computes per-channel version deltas
//! - [`diff`]: Renders deltas as unified-diff style text

pub mod diff;
pub mod inventory;
pub mod policy;
pub mod reconcile;

pub use inventory::{BucketKey, Inventory};
pub use policy::{FloorMode, PackagePolicy, TrackingPolicy};
pub use reconcile::{ReconciliationResult, VersionState, reconcile};
