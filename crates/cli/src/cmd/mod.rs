mod build;
mod clean_builds;
mod copy_tools;
mod devices;
mod info;
mod package;
mod sync;

pub use build::{cmd_build, BuildArgs};
pub use clean_builds::cmd_clean_builds;
pub use copy_tools::cmd_copy_tools;
pub use devices::cmd_devices;
pub use info::cmd_info;
pub use package::{cmd_package, PackageArgs};
pub use sync::cmd_sync;
