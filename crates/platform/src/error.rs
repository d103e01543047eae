//! Error types for stagehand-platform

use thiserror::Error;

use crate::platform::TargetPlatform;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A delegated external tool exited with a non-zero code.
    #[error("external tool '{tool}' failed with exit code {code}")]
    ExternalTool { tool: String, code: i32 },

    /// The external tool was terminated before producing an exit code.
    #[error("external tool '{tool}' was terminated by a signal")]
    ToolTerminated { tool: String },

    /// Device enumeration ran but found nothing connected.
    #[error("no devices found for platform {platform}")]
    NoDevicesFound { platform: TargetPlatform },

    /// Device enumeration itself failed (distinct from an empty result).
    #[error("device enumeration failed for platform {platform}: {message}")]
    DeviceEnumeration {
        platform: TargetPlatform,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
