//! Built-in platform adapters.

mod android;
mod console;
mod desktop;
mod ios;

pub use android::AndroidAdapter;
pub use console::ConsoleAdapter;
pub use desktop::DesktopAdapter;
pub use ios::IosAdapter;

use std::sync::Arc;

use stagehand_platform::TargetPlatform;

use crate::adapter::AdapterRegistry;

/// Install every built-in adapter into the registry.
pub(crate) fn register_defaults(registry: &mut AdapterRegistry) {
    let desktop = Arc::new(DesktopAdapter::new());
    for platform in [
        TargetPlatform::Win64,
        TargetPlatform::Mac,
        TargetPlatform::Linux,
    ] {
        registry.register(platform, desktop.clone());
    }

    registry.register(TargetPlatform::Android, Arc::new(AndroidAdapter::new()));
    registry.register(TargetPlatform::Ios, Arc::new(IosAdapter::new()));

    for platform in [
        TargetPlatform::Ps4,
        TargetPlatform::XboxOne,
        TargetPlatform::Switch,
    ] {
        registry.register(platform, Arc::new(ConsoleAdapter::new(platform)));
    }
}
