//! iOS adapter, wrapping `xcrun` for packaging and `ios-deploy` for
//! device installs.

use std::io;
use std::path::PathBuf;

use tracing::info;

use stagehand_platform::{process, PlatformError, TargetPlatform};

use crate::adapter::PlatformAdapter;
use crate::context::DeploymentContext;
use crate::params::ProjectParams;

#[derive(Debug)]
pub struct IosAdapter {
    xcrun: String,
    deploy_tool: String,
}

impl IosAdapter {
    pub fn new() -> Self {
        Self {
            xcrun: "xcrun".to_string(),
            deploy_tool: "ios-deploy".to_string(),
        }
    }

    fn staged_app(&self, context: &DeploymentContext) -> Result<PathBuf, PlatformError> {
        let stage = context.stage_directory.as_deref().ok_or_else(|| {
            PlatformError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no staged directory for ios package",
            ))
        })?;
        let name = context
            .executable_names
            .first()
            .cloned()
            .unwrap_or_else(|| "Payload".to_string());
        Ok(stage.join(format!("{}.app", name)))
    }

    fn ipa_path(&self, context: &DeploymentContext, app: &PathBuf) -> PathBuf {
        let out_dir = context
            .archive_directory
            .clone()
            .or_else(|| app.parent().map(PathBuf::from))
            .unwrap_or_default();
        out_dir.join(
            app.file_stem()
                .map(|s| format!("{}.ipa", s.to_string_lossy()))
                .unwrap_or_else(|| "Payload.ipa".to_string()),
        )
    }

    /// `ios-deploy --detect` prints one `[....] Found <id> ...` line per
    /// connected device.
    fn parse_devices(output: &str) -> Vec<String> {
        output
            .lines()
            .filter_map(|line| {
                let rest = line.split("Found ").nth(1)?;
                rest.split_whitespace().next().map(str::to_string)
            })
            .collect()
    }
}

impl Default for IosAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for IosAdapter {
    fn package(
        &self,
        _params: &ProjectParams,
        context: &DeploymentContext,
        _working_changelist: u32,
    ) -> Result<(), PlatformError> {
        let app = self.staged_app(context)?;
        let ipa = self.ipa_path(context, &app);

        let app_arg = app.to_string_lossy();
        let ipa_arg = ipa.to_string_lossy();
        process::run_tool(
            &self.xcrun,
            [
                "-sdk",
                "iphoneos",
                "PackageApplication",
                app_arg.as_ref(),
                "-o",
                ipa_arg.as_ref(),
            ],
        )?;

        info!(ipa = %ipa.display(), "ios package written");
        Ok(())
    }

    fn deploy(
        &self,
        params: &ProjectParams,
        context: &DeploymentContext,
    ) -> Result<(), PlatformError> {
        let app = self.staged_app(context)?;
        let ipa = self.ipa_path(context, &app);
        let devices = if params.device_names.is_empty() {
            self.connected_devices(params)?
        } else {
            params.device_names.clone()
        };

        let ipa_arg = ipa.to_string_lossy();
        for device in &devices {
            process::run_tool(
                &self.deploy_tool,
                ["--id", device.as_str(), "--bundle", ipa_arg.as_ref()],
            )?;
            info!(device = %device, "ipa installed");
        }
        Ok(())
    }

    fn requires_package_to_deploy(&self) -> bool {
        true
    }

    fn connected_devices(&self, _params: &ProjectParams) -> Result<Vec<String>, PlatformError> {
        let output = process::run_tool(&self.deploy_tool, ["--detect", "--timeout", "1"])
            .map_err(|e| PlatformError::DeviceEnumeration {
                platform: TargetPlatform::Ios,
                message: e.to_string(),
            })?;

        let devices = Self::parse_devices(&output);
        if devices.is_empty() {
            return Err(PlatformError::NoDevicesFound {
                platform: TargetPlatform::Ios,
            });
        }
        Ok(devices)
    }
}
