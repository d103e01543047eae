//! Implementation of the `stagehand copy-tools` command.
//!
//! Collects files under a root directory through a glob and copies them into
//! a destination directory, preserving each file's path relative to the root.

use std::path::Path;

use anyhow::Result;

use stagehand_core::{copy_build_products, BuildProductManifest, ExtraFileRule};

use crate::output;

pub fn cmd_copy_tools(root: &Path, out_dir: &Path, pattern: &str) -> Result<()> {
    let rule = ExtraFileRule::new(root, pattern);

    let mut manifest = BuildProductManifest::new();
    for path in rule.resolve()? {
        manifest.add(path)?;
    }

    let copied = copy_build_products(&manifest, root, out_dir)?;
    output::print_success(&format!("Copied {} file(s) to {}", copied, out_dir.display()));
    Ok(())
}
