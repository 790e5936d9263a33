//! Version layer for package tracking
//!
//! This module provides version parsing and ordering, and access to the remote
//! registries that publish package versions per release channel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│    Types    │
//! │  (search)   │     │(SourceEntry)│
//! └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Registries │     │   Semver    │
//! │    (epr)    │     │(version cmp)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for searching remote sources
//! - [`registries`]: Concrete registry implementations
//! - [`error`]: Error types for version parsing and registry operations
//! - [`semver`]: Version parsing, ordering and floor comparison
//! - [`types`]: Common types like `SourceEntry` and `RegistryHit`

pub mod error;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
