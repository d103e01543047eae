//! Target platform and build configuration identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A platform that build targets can be compiled, staged, and packaged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Win64,
    Mac,
    Linux,
    Android,
    Ios,
    Ps4,
    XboxOne,
    Switch,
}

impl TargetPlatform {
    /// All platforms stagehand knows how to dispatch to.
    pub const ALL: [TargetPlatform; 8] = [
        TargetPlatform::Win64,
        TargetPlatform::Mac,
        TargetPlatform::Linux,
        TargetPlatform::Android,
        TargetPlatform::Ios,
        TargetPlatform::Ps4,
        TargetPlatform::XboxOne,
        TargetPlatform::Switch,
    ];

    /// Returns the platform name as used in staging directories and
    /// executable suffixes.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Win64 => "Win64",
            TargetPlatform::Mac => "Mac",
            TargetPlatform::Linux => "Linux",
            TargetPlatform::Android => "Android",
            TargetPlatform::Ios => "IOS",
            TargetPlatform::Ps4 => "PS4",
            TargetPlatform::XboxOne => "XboxOne",
            TargetPlatform::Switch => "Switch",
        }
    }

    /// Whether this platform is a desktop host rather than a device target.
    pub const fn is_desktop(&self) -> bool {
        matches!(
            self,
            TargetPlatform::Win64 | TargetPlatform::Mac | TargetPlatform::Linux
        )
    }

    /// Executable extension for binaries built for this platform.
    pub const fn exe_extension(&self) -> &'static str {
        match self {
            TargetPlatform::Win64 | TargetPlatform::XboxOne => ".exe",
            TargetPlatform::Android => ".apk",
            TargetPlatform::Ps4 | TargetPlatform::Switch => ".elf",
            TargetPlatform::Mac | TargetPlatform::Linux | TargetPlatform::Ios => "",
        }
    }

    /// Detect the platform matching the current host.
    pub const fn host() -> Self {
        #[cfg(target_os = "windows")]
        {
            TargetPlatform::Win64
        }
        #[cfg(target_os = "macos")]
        {
            TargetPlatform::Mac
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            TargetPlatform::Linux
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win64" | "windows" => Ok(TargetPlatform::Win64),
            "mac" | "macos" => Ok(TargetPlatform::Mac),
            "linux" => Ok(TargetPlatform::Linux),
            "android" => Ok(TargetPlatform::Android),
            "ios" => Ok(TargetPlatform::Ios),
            "ps4" => Ok(TargetPlatform::Ps4),
            "xboxone" | "xbox" => Ok(TargetPlatform::XboxOne),
            "switch" => Ok(TargetPlatform::Switch),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    Debug,
    Development,
    Test,
    Shipping,
}

impl Configuration {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Development => "Development",
            Configuration::Test => "Test",
            Configuration::Shipping => "Shipping",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Configuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Configuration::Debug),
            "development" | "dev" => Ok(Configuration::Development),
            "test" => Ok(Configuration::Test),
            "shipping" => Ok(Configuration::Shipping),
            other => Err(format!("unknown configuration '{}'", other)),
        }
    }
}

/// Host machine identity, gathered once at process start.
///
/// Callers that need defaults (workspace names, version branches) take this
/// struct rather than reading ambient state themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    pub platform: TargetPlatform,
    pub hostname: String,
    pub username: String,
}

impl HostInfo {
    /// Gather current host information.
    pub fn current() -> Self {
        Self {
            platform: TargetPlatform::host(),
            hostname: whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string()),
            username: whoami::username(),
        }
    }
}
