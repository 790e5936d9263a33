//! Registry implementations for searching published package versions

pub mod epr;

pub use epr::EprRegistry;
