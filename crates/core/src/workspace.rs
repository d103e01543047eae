//! Temporary version-control workspaces.
//!
//! A build that needs pristine depot content syncs it through a throwaway
//! workspace. The workspace is uniquely named so concurrent agents on one
//! machine never collide, and deletion runs on every exit path: a leaked
//! client on a build agent blocks later syncs of the same tree.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use tracing::{info, warn};

use stagehand_platform::{process, HostInfo, PlatformError};

use crate::error::WorkspaceError;

/// Minimal version-control surface the sync flow needs.
pub trait VersionControl {
    fn create_workspace(
        &self,
        name: &str,
        depot_path: &str,
        root: &Path,
    ) -> Result<(), PlatformError>;

    fn sync(&self, name: &str, path_spec: &str) -> Result<(), PlatformError>;

    fn delete_workspace(&self, name: &str) -> Result<(), PlatformError>;
}

/// A created workspace that deletes itself when dropped.
///
/// Cleanup failure is logged at warn and swallowed so it never masks the
/// error that unwound the sync in the first place.
pub struct ScopedWorkspace<'a> {
    vcs: &'a dyn VersionControl,
    name: String,
}

impl<'a> ScopedWorkspace<'a> {
    pub fn create(
        vcs: &'a dyn VersionControl,
        name: String,
        depot_path: &str,
        root: &Path,
    ) -> Result<Self, WorkspaceError> {
        vcs.create_workspace(&name, depot_path, root)
            .map_err(|source| WorkspaceError::Create {
                name: name.clone(),
                source,
            })?;
        info!(workspace = %name, root = %root.display(), "workspace created");
        Ok(Self { vcs, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sync(&self, path_spec: &str) -> Result<(), WorkspaceError> {
        self.vcs
            .sync(&self.name, path_spec)
            .map_err(|source| WorkspaceError::Sync {
                name: self.name.clone(),
                source,
            })
    }
}

impl Drop for ScopedWorkspace<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.vcs.delete_workspace(&self.name) {
            warn!(workspace = %self.name, error = %err, "failed to delete workspace");
        } else {
            info!(workspace = %self.name, "workspace deleted");
        }
    }
}

static WORKSPACE_SEQ: AtomicU32 = AtomicU32::new(0);

/// Workspace name unique across machines, processes, and calls.
fn unique_workspace_name(host: &HostInfo) -> String {
    format!(
        "stagehand-{}-{}-{}-{}",
        host.hostname,
        std::process::id(),
        Utc::now().format("%Y%m%d%H%M%S"),
        WORKSPACE_SEQ.fetch_add(1, Ordering::Relaxed),
    )
}

/// Sync everything under `depot_path` into `output_dir` through a uniquely
/// named temporary workspace. The workspace is deleted whether or not the
/// sync succeeds.
pub fn sync_workspace(
    vcs: &dyn VersionControl,
    host: &HostInfo,
    depot_path: &str,
    output_dir: &Path,
) -> Result<(), WorkspaceError> {
    let name = unique_workspace_name(host);
    let workspace = ScopedWorkspace::create(vcs, name, depot_path, output_dir)?;

    let path_spec = format!("{}/...", depot_path.trim_end_matches('/'));
    workspace.sync(&path_spec)?;

    info!(depot = %depot_path, out = %output_dir.display(), "workspace sync complete");
    Ok(())
}

/// `p4` command-line wrapper.
pub struct PerforceTool {
    p4: String,
}

impl PerforceTool {
    pub fn new() -> Self {
        Self {
            p4: "p4".to_string(),
        }
    }

    /// Shell command that generates the client spec and pipes it straight
    /// back into p4. Root and name are quoted; workspace roots on build
    /// agents routinely contain spaces.
    fn client_spec_command(&self, name: &str, depot_path: &str, root: &Path) -> String {
        format!(
            "{p4} --field 'Root={root}' --field 'View={depot}/... //{name}/...' client -o '{name}' | {p4} client -i",
            p4 = self.p4,
            root = root.display(),
            depot = depot_path.trim_end_matches('/'),
        )
    }
}

impl Default for PerforceTool {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for PerforceTool {
    fn create_workspace(
        &self,
        name: &str,
        depot_path: &str,
        root: &Path,
    ) -> Result<(), PlatformError> {
        process::run_shell(&self.client_spec_command(name, depot_path, root), None)?;
        Ok(())
    }

    fn sync(&self, name: &str, path_spec: &str) -> Result<(), PlatformError> {
        process::run_tool(&self.p4, ["-c", name, "sync", "-f", path_spec])?;
        Ok(())
    }

    fn delete_workspace(&self, name: &str) -> Result<(), PlatformError> {
        process::run_tool(&self.p4, ["client", "-d", name])?;
        Ok(())
    }
}
