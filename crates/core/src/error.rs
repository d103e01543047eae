//! Error types for stagehand-core
//!
//! One enum per pipeline phase. Nothing here retries: toolchain and packager
//! invocations are expensive and unsafe to re-run blindly, so every failure
//! propagates to the top-level command, which reports and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

use stagehand_platform::{PlatformError, TargetPlatform};

/// Errors from agenda assembly, compilation, and manifest verification.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A target in the agenda failed to compile. Fatal to the whole build;
    /// there is no partial-success mode.
    #[error("compilation failed for target '{target}': {source}")]
    Compile {
        target: String,
        #[source]
        source: PlatformError,
    },

    /// A path was declared as a build product but does not exist on disk.
    #[error("build product does not exist: {0}")]
    ProductDoesNotExist(PathBuf),

    /// A manifest path vanished between compilation and verification.
    /// Indicates a silent toolchain failure.
    #[error("build product no longer exists: {0}")]
    MissingBuildProduct(PathBuf),

    /// An extra-file rule matched nothing or could not be evaluated.
    #[error("extra file rule '{pattern}' under {base} matched no files")]
    ExtraFilesNotFound { base: PathBuf, pattern: String },

    #[error("invalid extra file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A build target was given an empty target name.
    #[error("build target name must not be empty")]
    EmptyTargetName,

    /// Version stamping failed before compilation started.
    #[error("failed to update version files: {0}")]
    VersionStamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Missing or contradictory required parameters. Detected eagerly, before
/// any I/O side effect; always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no project file specified")]
    MissingProjectFile,

    #[error("no stage directory specified but staging was requested")]
    MissingStageDirectory,

    #[error("no platforms requested for {kind}")]
    NoPlatforms { kind: &'static str },

    #[error("client and server are both excluded; nothing to stage")]
    NothingToStage,

    #[error("contradictory parameters: {0}")]
    Contradiction(String),
}

/// Errors from the package/deploy driver.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no adapter registered for platform {0}")]
    UnsupportedPlatform(TargetPlatform),

    #[error("packaging failed for platform {platform}: {source}")]
    Package {
        platform: TargetPlatform,
        #[source]
        source: PlatformError,
    },

    #[error("deployment failed for platform {platform}: {source}")]
    Deploy {
        platform: TargetPlatform,
        #[source]
        source: PlatformError,
    },
}

/// Errors from staging, artifact copying, and build retention sweeps.
#[derive(Debug, Error)]
pub enum StageError {
    /// A build product lies outside the copy root, so no relative staging
    /// path can be derived for it.
    #[error("build product {product} is not under root {root}")]
    OutsideRoot { product: PathBuf, root: PathBuf },

    #[error("invalid search pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("parent directory does not exist: {0}")]
    MissingParentDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Version-control workspace create/sync/delete failure.
///
/// Cleanup (delete) is attempted even when sync fails; a cleanup failure is
/// logged but never masks the original sync error.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace '{name}': {source}")]
    Create {
        name: String,
        #[source]
        source: PlatformError,
    },

    #[error("failed to sync workspace '{name}': {source}")]
    Sync {
        name: String,
        #[source]
        source: PlatformError,
    },

    #[error("failed to delete workspace '{name}': {source}")]
    Delete {
        name: String,
        #[source]
        source: PlatformError,
    },
}
