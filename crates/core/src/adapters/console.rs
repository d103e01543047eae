//! Console adapter for PS4, Xbox One, and Switch.
//!
//! Consoles share one shape: an SDK packaging tool builds the distributable
//! from the staged directory, a deploy tool pushes it to a devkit, and a
//! neighborhood tool enumerates devkits. Only the tool names differ.

use std::io;
use std::path::Path;

use tracing::info;

use stagehand_platform::{process, PlatformError, TargetPlatform};

use crate::adapter::PlatformAdapter;
use crate::context::DeploymentContext;
use crate::params::ProjectParams;

#[derive(Debug)]
pub struct ConsoleAdapter {
    platform: TargetPlatform,
    package_tool: &'static str,
    deploy_tool: &'static str,
}

impl ConsoleAdapter {
    pub fn new(platform: TargetPlatform) -> Self {
        let (package_tool, deploy_tool) = match platform {
            TargetPlatform::Ps4 => ("orbis-pub-cmd", "orbis-ctrl"),
            TargetPlatform::XboxOne => ("makepkg", "xbconnect"),
            TargetPlatform::Switch => ("AuthoringTool", "ControlTarget"),
            _ => ("console-pkg", "console-ctrl"),
        };
        Self {
            platform,
            package_tool,
            deploy_tool,
        }
    }

    fn stage_dir<'a>(&self, context: &'a DeploymentContext) -> Result<&'a Path, PlatformError> {
        context.stage_directory.as_deref().ok_or_else(|| {
            PlatformError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no staged directory for console package",
            ))
        })
    }
}

impl PlatformAdapter for ConsoleAdapter {
    fn package(
        &self,
        _params: &ProjectParams,
        context: &DeploymentContext,
        working_changelist: u32,
    ) -> Result<(), PlatformError> {
        let stage = self.stage_dir(context)?;
        let out_dir = context
            .archive_directory
            .clone()
            .or_else(|| stage.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        let stage_arg = stage.to_string_lossy();
        let out_arg = out_dir.to_string_lossy();
        let label = format!("CL-{working_changelist}");
        process::run_tool(
            self.package_tool,
            [
                "package",
                "--source",
                stage_arg.as_ref(),
                "--output",
                out_arg.as_ref(),
                "--label",
                &label,
            ],
        )?;

        info!(platform = %self.platform, out = %out_dir.display(), "console package written");
        Ok(())
    }

    fn deploy(
        &self,
        params: &ProjectParams,
        context: &DeploymentContext,
    ) -> Result<(), PlatformError> {
        let stage = self.stage_dir(context)?;
        let devices = if params.device_names.is_empty() {
            self.connected_devices(params)?
        } else {
            params.device_names.clone()
        };

        let stage_arg = stage.to_string_lossy();
        for device in &devices {
            process::run_tool(
                self.deploy_tool,
                ["install", "--target", device.as_str(), stage_arg.as_ref()],
            )?;
            info!(platform = %self.platform, device = %device, "package installed on devkit");
        }
        Ok(())
    }

    fn requires_package_to_deploy(&self) -> bool {
        true
    }

    fn connected_devices(&self, _params: &ProjectParams) -> Result<Vec<String>, PlatformError> {
        let output = process::run_tool(self.deploy_tool, ["list-targets"]).map_err(|e| {
            PlatformError::DeviceEnumeration {
                platform: self.platform,
                message: e.to_string(),
            }
        })?;

        let devices: Vec<String> = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if devices.is_empty() {
            return Err(PlatformError::NoDevicesFound {
                platform: self.platform,
            });
        }
        Ok(devices)
    }
}
