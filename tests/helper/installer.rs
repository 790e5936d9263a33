//! Installer test utilities

use std::sync::Mutex;

use async_trait::async_trait;

use package_tracker::update::{InstallError, InstallReport, InstallRequest, Installer};

/// Installer that records requests and fails for chosen versions
#[derive(Default)]
pub struct RecordingInstaller {
    fail_versions: Vec<String>,
    requests: Mutex<Vec<InstallRequest>>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, version: &str) -> Self {
        self.fail_versions.push(version.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{}/{}/{}", r.channel, r.package, r.version))
            .collect()
    }
}

#[async_trait]
impl Installer for RecordingInstaller {
    async fn install(&self, request: &InstallRequest) -> Result<InstallReport, InstallError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_versions.contains(&request.version) {
            return Err(InstallError::Failed {
                status: "exit status: 1".to_string(),
                stderr: format!("cannot install {}", request.version),
            });
        }
        Ok(InstallReport {
            platform_version: Some("8.11.0".to_string()),
        })
    }
}
