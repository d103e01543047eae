//! Platform capability abstraction.
//!
//! Every per-platform difference in packaging, deployment, and device
//! discovery lives behind [`PlatformAdapter`]. The driver resolves adapters
//! through an [`AdapterRegistry`] populated once at startup; tests install
//! recording adapters through [`AdapterRegistry::register`].

use std::collections::HashMap;
use std::sync::Arc;

use stagehand_platform::{process, PlatformError, TargetPlatform};

use crate::context::DeploymentContext;
use crate::error::PackageError;
use crate::params::ProjectParams;

/// Per-platform packaging and deployment operations.
///
/// Implementations must be stateless with respect to a single run; any
/// required tooling state lives in the context or params.
pub trait PlatformAdapter: Send + Sync {
    /// Turn the staged directory into a distributable package.
    fn package(
        &self,
        params: &ProjectParams,
        context: &DeploymentContext,
        working_changelist: u32,
    ) -> Result<(), PlatformError>;

    /// Push the packaged or staged build onto connected devices.
    fn deploy(&self, params: &ProjectParams, context: &DeploymentContext)
        -> Result<(), PlatformError>;

    /// Whether this platform cannot deploy raw staged output and must
    /// package first.
    fn requires_package_to_deploy(&self) -> bool;

    /// Enumerate devices currently reachable for deployment.
    ///
    /// An empty result where devices were expected is
    /// [`PlatformError::NoDevicesFound`]; a failure to ask at all is
    /// [`PlatformError::DeviceEnumeration`]. The two are distinct so callers
    /// can tell "plug a device in" apart from "your SDK install is broken".
    fn connected_devices(&self, params: &ProjectParams) -> Result<Vec<String>, PlatformError>;

    /// Escape hatch for platform SDK commands not covered by the trait.
    /// Non-zero exits map to [`PlatformError::ExternalTool`].
    fn run_command(&self, command: &str) -> Result<String, PlatformError> {
        process::run_shell(command, None)
    }
}

/// Startup-time map from platform to its adapter.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<TargetPlatform, Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::adapters::register_defaults(&mut registry);
        registry
    }

    pub fn register(&mut self, platform: TargetPlatform, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(platform, adapter);
    }

    pub fn get(&self, platform: TargetPlatform) -> Result<&Arc<dyn PlatformAdapter>, PackageError> {
        self.adapters
            .get(&platform)
            .ok_or(PackageError::UnsupportedPlatform(platform))
    }

    pub fn platforms(&self) -> impl Iterator<Item = TargetPlatform> + '_ {
        self.adapters.keys().copied()
    }
}
