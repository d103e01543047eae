//! Staging helpers: copying build products and sweeping old formal builds.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use globset::Glob;
use tracing::{debug, info};

use crate::error::StageError;
use crate::manifest::BuildProductManifest;

/// Copy every manifest product into `target_dir`, preserving each product's
/// path relative to `root`. Returns the number of files copied.
pub fn copy_build_products(
    manifest: &BuildProductManifest,
    root: &Path,
    target_dir: &Path,
) -> Result<usize, StageError> {
    let mut copied = 0;
    for product in manifest.iter() {
        let relative = product
            .strip_prefix(root)
            .map_err(|_| StageError::OutsideRoot {
                product: product.clone(),
                root: root.to_path_buf(),
            })?;
        let dest = target_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(product, &dest)?;
        debug!(from = %product.display(), to = %dest.display(), "build product copied");
        copied += 1;
    }

    info!(count = copied, target = %target_dir.display(), "build products copied");
    Ok(copied)
}

/// Default retention window for formal builds.
pub const DEFAULT_RETENTION_DAYS: u64 = 4;

/// Default directory-name pattern matched by the retention sweep.
pub const DEFAULT_BUILD_PATTERN: &str = "Build-*";

/// What a retention sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed: usize,
    pub kept: usize,
}

/// Remove build directories under `parent_dir` whose names match
/// `search_pattern` and whose modification time is older than the retention
/// window. `days` defaults to [`DEFAULT_RETENTION_DAYS`] when unset.
pub fn clean_formal_builds(
    parent_dir: &Path,
    search_pattern: &str,
    days: Option<u64>,
) -> Result<CleanSummary, StageError> {
    if !parent_dir.is_dir() {
        return Err(StageError::MissingParentDir(parent_dir.to_path_buf()));
    }

    let matcher = Glob::new(search_pattern)
        .map_err(|e| StageError::InvalidPattern {
            pattern: search_pattern.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let days = days.unwrap_or(DEFAULT_RETENTION_DAYS);
    // A window too large to represent keeps everything.
    let cutoff = SystemTime::now().checked_sub(Duration::from_secs(days.saturating_mul(86_400)));

    let mut summary = CleanSummary::default();
    for entry in fs::read_dir(parent_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || !matcher.is_match(entry.file_name()) {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        let expired = matches!(cutoff, Some(cutoff) if modified < cutoff);
        if expired {
            info!(dir = %entry.path().display(), "removing expired build");
            fs::remove_dir_all(entry.path())?;
            summary.removed += 1;
        } else {
            debug!(dir = %entry.path().display(), "build within retention window");
            summary.kept += 1;
        }
    }

    info!(
        removed = summary.removed,
        kept = summary.kept,
        days,
        "build retention sweep complete"
    );
    Ok(summary)
}
