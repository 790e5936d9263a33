//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod installer;
pub mod registry;
pub mod store;

pub use installer::RecordingInstaller;
pub use registry::StaticRegistry;
pub use store::{create_asset_store, create_package_store, entries};
