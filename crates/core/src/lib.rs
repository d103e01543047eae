//! stagehand-core: build agenda orchestration and staging/deployment
//!
//! This crate provides the build orchestration pipeline: assemble a
//! [`BuildAgenda`] of targets, drive the toolchain over it with
//! [`BuildOrchestrator`], verify the resulting [`BuildProductManifest`],
//! then derive [`DeploymentContext`]s from [`ProjectParams`] and dispatch
//! packaging and deployment through per-platform [`PlatformAdapter`]s.
//!
//! All work is sequential and fail-fast: one invocation owns its manifest
//! and staging directories, and the first failure aborts the run.

pub mod adapter;
pub mod adapters;
pub mod agenda;
pub mod context;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod package;
pub mod params;
pub mod stage;
pub mod version;
pub mod workspace;

pub use adapter::{AdapterRegistry, PlatformAdapter};
pub use agenda::{add_tool_files_to_agenda, BuildAgenda, BuildTarget, ExtraFileRule, KnownTool};
pub use context::{create_deployment_contexts, gather_deployment_contexts, DeployKind, DeploymentContext};
pub use error::{BuildError, ConfigError, PackageError, StageError, WorkspaceError};
pub use manifest::{check_build_products, BuildProductManifest};
pub use orchestrator::{BuildOptions, BuildOrchestrator, NativeToolchain, Toolchain};
pub use package::{PackageCommand, PackageSummary};
pub use params::ProjectParams;
pub use stage::{clean_formal_builds, copy_build_products, CleanSummary};
pub use version::{update_version_files, BuildEnvironment, VersionOverrides};
pub use workspace::{sync_workspace, PerforceTool, VersionControl};

// Re-export platform identity types for convenience
pub use stagehand_platform::{Configuration, HostInfo, PlatformError, TargetPlatform};
