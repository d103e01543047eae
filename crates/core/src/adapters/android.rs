//! Android adapter, wrapping `adb`.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::info;

use stagehand_platform::{process, PlatformError, TargetPlatform};

use crate::adapter::PlatformAdapter;
use crate::context::DeploymentContext;
use crate::params::ProjectParams;

/// Android must install a package; there is no raw staged-directory deploy.
#[derive(Debug)]
pub struct AndroidAdapter {
    adb: String,
}

impl AndroidAdapter {
    pub fn new() -> Self {
        Self {
            adb: "adb".to_string(),
        }
    }

    /// Override the adb binary, for SDK installs outside PATH.
    pub fn with_adb(adb: impl Into<String>) -> Self {
        Self { adb: adb.into() }
    }

    /// Paths of the staged `.apk` files this context is expected to carry.
    fn staged_apks(&self, context: &DeploymentContext) -> Result<Vec<PathBuf>, PlatformError> {
        let stage = context.stage_directory.as_deref().ok_or_else(|| {
            PlatformError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no staged directory for android package",
            ))
        })?;

        let mut apks = Vec::new();
        for name in &context.executable_names {
            let apk = stage.join(name);
            if !apk.exists() {
                return Err(PlatformError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("staged apk not found: {}", apk.display()),
                )));
            }
            apks.push(apk);
        }
        Ok(apks)
    }

    /// Parse `adb devices` output: one serial per line, header dropped,
    /// only entries in the `device` state count as connected.
    fn parse_devices(output: &str) -> Vec<String> {
        output
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(serial), Some("device")) => Some(serial.to_string()),
                    _ => None,
                }
            })
            .collect()
    }
}

impl Default for AndroidAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for AndroidAdapter {
    /// The toolchain already emits the `.apk`; packaging verifies the staged
    /// apks and copies them into the archive directory when one is set.
    fn package(
        &self,
        _params: &ProjectParams,
        context: &DeploymentContext,
        _working_changelist: u32,
    ) -> Result<(), PlatformError> {
        let apks = self.staged_apks(context)?;

        if let Some(archive_dir) = &context.archive_directory {
            fs::create_dir_all(archive_dir)?;
            for apk in &apks {
                if let Some(name) = apk.file_name() {
                    fs::copy(apk, archive_dir.join(name))?;
                }
            }
        }

        info!(count = apks.len(), "android packages ready");
        Ok(())
    }

    fn deploy(
        &self,
        params: &ProjectParams,
        context: &DeploymentContext,
    ) -> Result<(), PlatformError> {
        let apks = self.staged_apks(context)?;
        let devices = if params.device_names.is_empty() {
            self.connected_devices(params)?
        } else {
            params.device_names.clone()
        };

        for device in &devices {
            for apk in &apks {
                let apk_arg = apk.to_string_lossy();
                process::run_tool(
                    &self.adb,
                    ["-s", device.as_str(), "install", "-r", apk_arg.as_ref()],
                )?;
                info!(device = %device, apk = %apk.display(), "apk installed");
            }
        }
        Ok(())
    }

    fn requires_package_to_deploy(&self) -> bool {
        true
    }

    fn connected_devices(&self, _params: &ProjectParams) -> Result<Vec<String>, PlatformError> {
        let output = process::run_tool(&self.adb, ["devices"]).map_err(|e| {
            PlatformError::DeviceEnumeration {
                platform: TargetPlatform::Android,
                message: e.to_string(),
            }
        })?;

        let devices = Self::parse_devices(&output);
        if devices.is_empty() {
            return Err(PlatformError::NoDevicesFound {
                platform: TargetPlatform::Android,
            });
        }
        Ok(devices)
    }
}
