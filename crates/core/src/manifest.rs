//! Build product manifests and the post-build integrity gate.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::BuildError;

/// The set of file paths produced by one orchestrator invocation.
///
/// Insertion order is preserved for logging; duplicate paths are ignored so
/// agenda helpers can be invoked more than once without duplicating entries.
/// Owned exclusively by one build pass and never shared across invocations.
#[derive(Debug, Clone, Default)]
pub struct BuildProductManifest {
    products: Vec<PathBuf>,
}

impl BuildProductManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a build product. The file must already exist on disk; a product
    /// that was reported but never produced is a toolchain failure, caught
    /// here rather than at verification time.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Result<(), BuildError> {
        let path = path.into();
        if !path.exists() {
            return Err(BuildError::ProductDoesNotExist(path));
        }
        if !self.contains(&path) {
            debug!(product = %path.display(), "build product added");
            self.products.push(path);
        }
        Ok(())
    }

    /// Record a product plus any `.pdb`/`.xml` sidecars sitting next to it.
    /// Sidecars are optional; only present ones are included.
    pub fn add_with_sidecars(&mut self, path: impl Into<PathBuf>) -> Result<(), BuildError> {
        let path = path.into();
        self.add(path.clone())?;
        for ext in ["pdb", "xml"] {
            let sidecar = path.with_extension(ext);
            if sidecar.exists() && sidecar != path {
                self.add(sidecar)?;
            }
        }
        Ok(())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.products.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// The sole integrity gate between "compilation reported success" and
/// "callers may trust the manifest": every manifest path must still exist on
/// disk. A missing path means a toolchain failed silently, and the whole
/// build is considered failed.
pub fn check_build_products(manifest: &BuildProductManifest) -> Result<(), BuildError> {
    if manifest.is_empty() {
        info!("no build products were made");
        return Ok(());
    }

    for product in manifest.iter() {
        if !product.exists() {
            return Err(BuildError::MissingBuildProduct(product.clone()));
        }
        debug!(product = %product.display(), "build product verified");
    }

    info!(count = manifest.len(), "build products verified");
    Ok(())
}
