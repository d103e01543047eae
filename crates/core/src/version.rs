//! Version stamping: embedding changelist/branch metadata into builds.
//!
//! The orchestrator stamps version files before compilation so emitted
//! binaries carry correct metadata. Environment discovery happens once, at
//! process start, into an explicit [`BuildEnvironment`]; nothing in the
//! pipeline reads ambient state after that.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use stagehand_platform::HostInfo;

use crate::error::BuildError;

/// Process-wide build environment, populated once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildEnvironment {
    pub changelist: u32,
    pub compatible_changelist: u32,
    pub branch: String,
    pub build_string: Option<String>,
    pub machine_name: String,
}

impl BuildEnvironment {
    /// Discover the environment from process variables and host identity.
    ///
    /// `STAGEHAND_CHANGELIST`, `STAGEHAND_COMPATIBLE_CHANGELIST`,
    /// `STAGEHAND_BRANCH`, and `STAGEHAND_BUILD` are the build-agent
    /// contract; absent values fall back to zero / `UNKNOWN`.
    pub fn discover(host: &HostInfo) -> Self {
        let changelist = env_u32("STAGEHAND_CHANGELIST");
        Self {
            changelist,
            compatible_changelist: std::env::var("STAGEHAND_COMPATIBLE_CHANGELIST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(changelist),
            branch: std::env::var("STAGEHAND_BRANCH").unwrap_or_else(|_| "UNKNOWN".to_string()),
            build_string: std::env::var("STAGEHAND_BUILD").ok(),
            machine_name: host.hostname.clone(),
        }
    }
}

fn env_u32(name: &str) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Optional overrides for one stamping pass. Absent values are taken from
/// the [`BuildEnvironment`].
#[derive(Debug, Clone, Default)]
pub struct VersionOverrides {
    pub changelist: Option<u32>,
    pub compatible_changelist: Option<u32>,
    pub build_string: Option<String>,
    /// Skip regenerating the version header, writing only `Build.version`.
    pub skip_header: bool,
}

/// On-disk version record consumed by build tooling and embedded installers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
struct BuildVersion {
    changelist: u32,
    compatible_changelist: u32,
    branch_name: String,
    build_version: String,
}

/// Write version files under `engine_root`, returning the paths written.
///
/// Always writes `Build.version`; also writes the generated `Version.inl`
/// header unless `skip_header` is set.
pub fn update_version_files(
    env: &BuildEnvironment,
    overrides: &VersionOverrides,
    engine_root: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
    let changelist = overrides.changelist.unwrap_or(env.changelist);
    let compatible_changelist = overrides
        .compatible_changelist
        .unwrap_or(env.compatible_changelist);
    let build_string = overrides
        .build_string
        .clone()
        .or_else(|| env.build_string.clone())
        .unwrap_or_else(|| format!("{}-CL-{}", env.branch.replace('/', "+"), changelist));

    let version = BuildVersion {
        changelist,
        compatible_changelist,
        branch_name: env.branch.clone(),
        build_version: build_string.clone(),
    };

    let build_dir = engine_root.join("Build");
    fs::create_dir_all(&build_dir)?;

    let mut written = Vec::new();

    let version_file = build_dir.join("Build.version");
    let json = serde_json::to_string_pretty(&version)
        .map_err(|e| BuildError::VersionStamp(e.to_string()))?;
    fs::write(&version_file, json)?;
    written.push(version_file);

    if !overrides.skip_header {
        let header_file = build_dir.join("Version.inl");
        fs::write(&header_file, render_header(&version))?;
        written.push(header_file);
    }

    info!(
        changelist,
        compatible_changelist,
        branch = %env.branch,
        build = %build_string,
        files = written.len(),
        "version files updated"
    );

    Ok(written)
}

fn render_header(version: &BuildVersion) -> String {
    format!(
        "// Generated by stagehand on {} - do not edit.\n\
         #define BUILT_FROM_CHANGELIST {}\n\
         #define COMPATIBLE_CHANGELIST {}\n\
         #define BRANCH_NAME \"{}\"\n\
         #define BUILD_VERSION \"{}\"\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        version.changelist,
        version.compatible_changelist,
        version.branch_name,
        version.build_version,
    )
}
