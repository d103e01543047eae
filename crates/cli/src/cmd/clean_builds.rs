//! Implementation of the `stagehand clean-builds` command.

use std::path::Path;

use anyhow::Result;

use stagehand_core::clean_formal_builds;

use crate::output;

pub fn cmd_clean_builds(parent_dir: &Path, pattern: &str, days: Option<u64>) -> Result<()> {
    let summary = clean_formal_builds(parent_dir, pattern, days)?;

    output::print_success("Retention sweep complete");
    output::print_stat("removed", &summary.removed.to_string());
    output::print_stat("kept", &summary.kept.to_string());
    Ok(())
}
