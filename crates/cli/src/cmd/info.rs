//! Implementation of the `stagehand info` command.

use anyhow::Result;
use serde::Serialize;

use stagehand_core::{BuildEnvironment, HostInfo};

use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct InfoReport {
    version: &'static str,
    host: HostInfo,
    environment: BuildEnvironment,
}

pub fn cmd_info(format: OutputFormat) -> Result<()> {
    let host = HostInfo::current();
    let environment = BuildEnvironment::discover(&host);

    if format.is_json() {
        return output::print_json(&InfoReport {
            version: env!("CARGO_PKG_VERSION"),
            host,
            environment,
        });
    }

    output::print_info(&format!("stagehand v{}", env!("CARGO_PKG_VERSION")));
    output::print_stat("platform", host.platform.as_str());
    output::print_stat("hostname", &host.hostname);
    output::print_stat("user", &host.username);
    output::print_stat("branch", &environment.branch);
    output::print_stat("changelist", &environment.changelist.to_string());
    Ok(())
}
