//! Implementation of the `stagehand build` command.
//!
//! Assembles a build agenda from the command line, runs the orchestrator
//! over it, verifies the build products, and prints the manifest.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use stagehand_core::{
    check_build_products, BuildAgenda, BuildEnvironment, BuildOptions, BuildOrchestrator,
    BuildTarget, ExtraFileRule, HostInfo, NativeToolchain, VersionOverrides,
};

use crate::output;

pub struct BuildArgs {
    pub targets: Vec<String>,
    pub project: Option<PathBuf>,
    pub tool: String,
    pub output_dir: PathBuf,
    pub engine_root: PathBuf,
    pub extra_files: Vec<String>,
    pub clean: bool,
    pub update_version: bool,
    pub changelist: Option<u32>,
}

/// Parse one `NAME:PLATFORM:CONFIG` target spec.
fn parse_target(spec: &str) -> Result<BuildTarget> {
    let parts: Vec<&str> = spec.split(':').collect();
    let [name, platform, config] = parts.as_slice() else {
        return Err(anyhow!(
            "invalid target '{spec}'; expected NAME:PLATFORM:CONFIG"
        ));
    };
    let platform = platform
        .parse()
        .map_err(|e: String| anyhow!("in target '{spec}': {e}"))?;
    let config = config
        .parse()
        .map_err(|e: String| anyhow!("in target '{spec}': {e}"))?;
    Ok(BuildTarget::new(*name, platform, config))
}

pub fn cmd_build(args: BuildArgs) -> Result<()> {
    let host = HostInfo::current();
    let env = BuildEnvironment::discover(&host);

    let mut agenda = BuildAgenda::new();
    for spec in &args.targets {
        let mut target = parse_target(spec)?;
        if let Some(project) = &args.project {
            target = target.with_project(project);
        }
        agenda.add_target(target)?;
    }
    for spec in &args.extra_files {
        let (base, pattern) = spec
            .rsplit_once(':')
            .with_context(|| format!("invalid extra-files '{spec}'; expected BASE_DIR:GLOB"))?;
        agenda.add_extra_files(ExtraFileRule::new(base, pattern));
    }

    let toolchain = NativeToolchain::new(&args.tool, &args.output_dir);
    let orchestrator = BuildOrchestrator::new(toolchain, env, &args.engine_root);
    let options = BuildOptions {
        delete_existing_products: args.clean,
        update_version_files: args.update_version,
        version_overrides: VersionOverrides {
            changelist: args.changelist,
            ..Default::default()
        },
    };

    let manifest = orchestrator.build(&agenda, &options)?;
    check_build_products(&manifest)?;

    output::print_success(&format!(
        "Built {} target(s), {} product(s)",
        agenda.targets().len(),
        manifest.len()
    ));
    for product in manifest.iter() {
        output::print_stat("product", &product.display().to_string());
    }
    Ok(())
}
