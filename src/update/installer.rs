//! External installer invocation

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::InstallerConfig;

/// One version to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub package: String,
    pub channel: String,
    pub version: String,
    /// Version directory in the local asset store
    pub dest: PathBuf,
}

/// What the installer observed while installing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub platform_version: Option<String>,
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to start installer {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Installer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Installer timed out after {0:?}")]
    TimedOut(Duration),
}

/// Trait for installing a package version into the local asset store
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, request: &InstallRequest) -> Result<InstallReport, InstallError>;
}

/// Runs a configured program once per version.
///
/// Arguments may contain `{package}`, `{version}`, `{channel}` and `{dest}`
/// placeholders. The last non-empty line the program prints on stdout is
/// taken as the platform version it installed against.
#[derive(Debug, Clone)]
pub struct ProcessInstaller {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessInstaller {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build from configuration; `None` when no installer command is set
    pub fn from_config(config: &InstallerConfig) -> Option<Self> {
        let program = config.command.as_ref()?;
        let installer = Self::new(program.clone(), config.args.clone());
        Some(match config.timeout_secs {
            Some(secs) => installer.with_timeout(Duration::from_secs(secs)),
            None => installer,
        })
    }

    fn expand_args(&self, request: &InstallRequest) -> Vec<String> {
        let dest = request.dest.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{package}", &request.package)
                    .replace("{version}", &request.version)
                    .replace("{channel}", &request.channel)
                    .replace("{dest}", &dest)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Installer for ProcessInstaller {
    async fn install(&self, request: &InstallRequest) -> Result<InstallReport, InstallError> {
        let args = self.expand_args(request);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, output)
                .await
                .map_err(|_| InstallError::TimedOut(timeout))?,
            None => output.await,
        }
        .map_err(|source| InstallError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(InstallError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let platform_version = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(str::to_string);

        Ok(InstallReport { platform_version })
    }
}
