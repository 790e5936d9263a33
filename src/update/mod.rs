//! Update layer: drives an external installer for versions missing locally
//!
//! - [`installer`]: Installer trait and the subprocess implementation
//! - [`driver`]: Plans and runs installs, recording metadata per version

pub mod driver;
pub mod installer;

pub use driver::{UpdateSummary, plan, run_update};
pub use installer::{InstallError, InstallReport, InstallRequest, Installer, ProcessInstaller};
