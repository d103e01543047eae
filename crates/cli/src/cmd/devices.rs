//! Implementation of the `stagehand devices` command.

use anyhow::{anyhow, Context, Result};

use stagehand_core::{AdapterRegistry, PlatformError, ProjectParams, TargetPlatform};

use crate::output::{self, OutputFormat};

pub fn cmd_devices(platform: &str, format: OutputFormat) -> Result<()> {
    let platform: TargetPlatform = platform.parse().map_err(|e: String| anyhow!(e))?;
    let registry = AdapterRegistry::with_defaults();
    let adapter = registry.get(platform)?;

    match adapter.connected_devices(&ProjectParams::default()) {
        Ok(devices) => {
            if format.is_json() {
                output::print_json(&devices)?;
            } else {
                output::print_info(&format!("{} device(s) connected", devices.len()));
                for device in &devices {
                    output::print_stat("device", device);
                }
            }
            Ok(())
        }
        // "Plug a device in" and "enumeration is broken" exit differently.
        Err(PlatformError::NoDevicesFound { .. }) => {
            Err(anyhow!("no devices connected for {platform}"))
        }
        Err(err @ PlatformError::DeviceEnumeration { .. }) => {
            Err(err).context(format!("failed to enumerate {platform} devices"))
        }
        Err(err) => Err(err.into()),
    }
}
