//! Implementation of the `stagehand package` command.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use stagehand_core::{
    AdapterRegistry, Configuration, PackageCommand, ProjectParams, TargetPlatform,
};

use crate::output;

pub struct PackageArgs {
    pub project: PathBuf,
    pub stage_dir: Option<PathBuf>,
    pub archive_dir: Option<PathBuf>,
    pub platforms: Vec<String>,
    pub server_platforms: Vec<String>,
    pub configs: Vec<String>,
    pub targets: Vec<String>,
    pub server_targets: Vec<String>,
    pub package: bool,
    pub deploy: bool,
    pub no_client: bool,
    pub dedicated_server: bool,
    pub skip_stage: bool,
    pub devices: Vec<String>,
    pub changelist: u32,
}

fn parse_platforms(specs: &[String]) -> Result<Vec<TargetPlatform>> {
    specs
        .iter()
        .map(|s| s.parse().map_err(|e: String| anyhow!(e)))
        .collect()
}

fn parse_configs(specs: &[String]) -> Result<Vec<Configuration>> {
    if specs.is_empty() {
        return Ok(vec![Configuration::Development]);
    }
    specs
        .iter()
        .map(|s| s.parse().map_err(|e: String| anyhow!(e)))
        .collect()
}

pub fn cmd_package(args: PackageArgs) -> Result<()> {
    let configs = parse_configs(&args.configs)?;
    let params = ProjectParams {
        project_path: args.project,
        stage_directory: args.stage_dir,
        archive_directory: args.archive_dir,
        client_platforms: parse_platforms(&args.platforms)?,
        server_platforms: parse_platforms(&args.server_platforms)?,
        client_configs: configs.clone(),
        server_configs: configs,
        client_targets: args.targets,
        server_targets: args.server_targets,
        no_client: args.no_client,
        dedicated_server: args.dedicated_server,
        package: args.package,
        deploy: args.deploy,
        skip_stage: args.skip_stage,
        device_names: args.devices,
    };

    let registry = AdapterRegistry::with_defaults();
    let summary = PackageCommand::run(&params, &registry, args.changelist)?;

    output::print_success("Package complete");
    output::print_stat("packaged", &summary.packaged.to_string());
    output::print_stat("deployed", &summary.deployed.to_string());
    Ok(())
}
