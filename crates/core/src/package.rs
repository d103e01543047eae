//! The package/deploy driver.
//!
//! One linear pass over the deployment contexts, in order, fail-fast. There
//! is no retry and no rollback: a failure part-way leaves earlier contexts
//! packaged/deployed and later ones untouched, and the error reports which
//! platform broke.

use tracing::{info, warn};

use crate::adapter::AdapterRegistry;
use crate::context::{gather_deployment_contexts, DeploymentContext};
use crate::error::PackageError;
use crate::params::ProjectParams;

/// Counts of what one driver pass actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageSummary {
    pub packaged: usize,
    pub deployed: usize,
}

/// Drives packaging and deployment for every requested context.
pub struct PackageCommand;

impl PackageCommand {
    /// Validate params, gather contexts, then package and deploy each one
    /// sequentially. An empty context list is a logged no-op.
    pub fn run(
        params: &ProjectParams,
        registry: &AdapterRegistry,
        working_changelist: u32,
    ) -> Result<PackageSummary, PackageError> {
        params.validate_and_log()?;

        let contexts = gather_deployment_contexts(params)?;
        if contexts.is_empty() {
            warn!("no deployment contexts requested; nothing to do");
            return Ok(PackageSummary::default());
        }

        info!(contexts = contexts.len(), "********** PACKAGE STARTED **********");

        let mut summary = PackageSummary::default();
        for context in &contexts {
            let adapter = registry.get(context.platform)?;

            // Deploying forces a package only on platforms that cannot
            // install raw staged output.
            let should_package =
                params.package || (adapter.requires_package_to_deploy() && params.deploy);

            if should_package {
                Self::log_step(context, "packaging");
                adapter
                    .package(params, context, working_changelist)
                    .map_err(|source| PackageError::Package {
                        platform: context.platform,
                        source,
                    })?;
                summary.packaged += 1;
            }

            if params.deploy {
                Self::log_step(context, "deploying");
                adapter
                    .deploy(params, context)
                    .map_err(|source| PackageError::Deploy {
                        platform: context.platform,
                        source,
                    })?;
                summary.deployed += 1;
            }
        }

        info!(
            packaged = summary.packaged,
            deployed = summary.deployed,
            "********** PACKAGE COMPLETED **********"
        );
        Ok(summary)
    }

    fn log_step(context: &DeploymentContext, step: &str) {
        info!(platform = %context.platform, kind = %context.kind, step, "package driver step");
    }
}
