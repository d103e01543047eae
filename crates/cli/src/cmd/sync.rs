//! Implementation of the `stagehand sync` command.

use std::path::Path;

use anyhow::Result;

use stagehand_core::{sync_workspace, HostInfo, PerforceTool};

use crate::output;

pub fn cmd_sync(depot_path: &str, out_dir: &Path) -> Result<()> {
    let host = HostInfo::current();
    let vcs = PerforceTool::new();

    sync_workspace(&vcs, &host, depot_path, out_dir)?;

    output::print_success(&format!("Synced {} to {}", depot_path, out_dir.display()));
    Ok(())
}
