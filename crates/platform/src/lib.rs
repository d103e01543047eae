//! stagehand-platform: target platform identity and external tool execution
//!
//! This crate is the leaf of the stagehand workspace. It knows which platforms
//! builds can target, how the host machine identifies itself, and how to run
//! external tools synchronously with exit codes mapped into the error
//! taxonomy. It knows nothing about agendas, manifests, or staging.

mod error;
mod platform;
pub mod process;

pub use error::PlatformError;
pub use platform::{Configuration, HostInfo, TargetPlatform};

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
