//! Deployment contexts: the per-platform view of one staging/packaging run.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use stagehand_platform::{Configuration, TargetPlatform};

use crate::agenda::BuildTarget;
use crate::error::ConfigError;
use crate::params::ProjectParams;

/// Whether a context stages the client or the dedicated server. The two use
/// distinct staging roots and executable sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployKind {
    Client,
    Server,
}

impl DeployKind {
    /// Suffix appended to the platform name in the staging directory,
    /// e.g. `LinuxServer` vs plain `Linux`.
    fn stage_suffix(&self) -> &'static str {
        match self {
            DeployKind::Client => "",
            DeployKind::Server => "Server",
        }
    }
}

impl fmt::Display for DeployKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployKind::Client => write!(f, "client"),
            DeployKind::Server => write!(f, "server"),
        }
    }
}

/// Everything a platform adapter needs to stage, package, and deploy one
/// platform/kind combination. Built from validated [`ProjectParams`], owned
/// by a single driver pass, and never shared across concurrent runs.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    pub platform: TargetPlatform,
    pub kind: DeployKind,
    pub project_path: PathBuf,
    /// Per-context staging directory, `<stage_root>/<Platform>[Server]`.
    /// `None` when staging is skipped and no stage root was given.
    pub stage_directory: Option<PathBuf>,
    pub archive_directory: Option<PathBuf>,
    /// File names of the executables expected in the staged build.
    pub executable_names: Vec<String>,
    pub deploy: bool,
    pub package: bool,
    pub skip_stage: bool,
}

impl DeploymentContext {
    /// Directory name of this context under the stage root.
    pub fn stage_dir_name(platform: TargetPlatform, kind: DeployKind) -> String {
        format!("{}{}", platform, kind.stage_suffix())
    }
}

fn executable_names(
    targets: &[String],
    configs: &[Configuration],
    platform: TargetPlatform,
) -> Vec<String> {
    let mut names = Vec::new();
    for target in targets {
        for config in configs {
            let base = BuildTarget::new(target.clone(), platform, *config).binary_name();
            names.push(format!("{}{}", base, platform.exe_extension()));
        }
    }
    names
}

/// Build the deployment contexts for one kind (client or server).
///
/// Required fields are checked here, not just in
/// [`ProjectParams::validate_and_log`]: a missing project file or a missing
/// stage root (without `skip_stage`) is rejected eagerly rather than
/// surfacing later inside an adapter. Fails with
/// [`ConfigError::NothingToStage`] when the params exclude both the client
/// and the server; callers iterating kinds should use
/// [`gather_deployment_contexts`] instead, which treats that case as an
/// empty collection.
pub fn create_deployment_contexts(
    params: &ProjectParams,
    dedicated_server: bool,
) -> Result<Vec<DeploymentContext>, ConfigError> {
    if !params.wants_client() && !params.wants_server() {
        return Err(ConfigError::NothingToStage);
    }
    if params.project_path.as_os_str().is_empty() {
        return Err(ConfigError::MissingProjectFile);
    }
    if !params.skip_stage && params.stage_directory.is_none() {
        return Err(ConfigError::MissingStageDirectory);
    }

    let (kind, platforms, targets, configs) = if dedicated_server {
        (
            DeployKind::Server,
            &params.server_platforms,
            &params.server_targets,
            &params.server_configs,
        )
    } else {
        (
            DeployKind::Client,
            &params.client_platforms,
            &params.client_targets,
            &params.client_configs,
        )
    };

    let mut contexts = Vec::with_capacity(platforms.len());
    for &platform in platforms {
        let stage_directory = params
            .stage_directory
            .as_ref()
            .map(|root| root.join(DeploymentContext::stage_dir_name(platform, kind)));

        debug!(%platform, %kind, stage = ?stage_directory, "deployment context created");
        contexts.push(DeploymentContext {
            platform,
            kind,
            project_path: params.project_path.clone(),
            stage_directory,
            archive_directory: params.archive_directory.clone(),
            executable_names: executable_names(targets, configs, platform),
            deploy: params.deploy,
            package: params.package,
            skip_stage: params.skip_stage,
        });
    }
    Ok(contexts)
}

/// Collect every context the driver should process: client contexts unless
/// excluded, then server contexts if requested. May return an empty list,
/// which the driver treats as a logged no-op.
pub fn gather_deployment_contexts(
    params: &ProjectParams,
) -> Result<Vec<DeploymentContext>, ConfigError> {
    let mut contexts = Vec::new();
    if params.wants_client() {
        contexts.extend(create_deployment_contexts(params, false)?);
    }
    if params.wants_server() {
        contexts.extend(create_deployment_contexts(params, true)?);
    }
    Ok(contexts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn params() -> ProjectParams {
        ProjectParams {
            project_path: PathBuf::from("/projects/Shooter/Shooter.project"),
            stage_directory: Some(PathBuf::from("/builds/staged")),
            client_platforms: vec![TargetPlatform::Win64, TargetPlatform::Linux],
            server_platforms: vec![TargetPlatform::Linux],
            client_targets: vec!["Shooter".to_string()],
            server_targets: vec!["ShooterServer".to_string()],
            dedicated_server: true,
            ..Default::default()
        }
    }

    #[test]
    fn client_contexts_use_plain_platform_directory() {
        let contexts = create_deployment_contexts(&params(), false).unwrap();
        assert_eq!(contexts.len(), 2);
        assert_eq!(
            contexts[0].stage_directory.as_deref(),
            Some(Path::new("/builds/staged/Win64"))
        );
        assert_eq!(contexts[0].kind, DeployKind::Client);
    }

    #[test]
    fn server_contexts_get_server_suffix() {
        let contexts = create_deployment_contexts(&params(), true).unwrap();
        assert_eq!(contexts.len(), 1);
        assert_eq!(
            contexts[0].stage_directory.as_deref(),
            Some(Path::new("/builds/staged/LinuxServer"))
        );
        assert_eq!(contexts[0].kind, DeployKind::Server);
    }

    #[test]
    fn development_executables_omit_config_suffix() {
        let contexts = create_deployment_contexts(&params(), false).unwrap();
        let win = &contexts[0];
        assert_eq!(win.executable_names, ["Shooter.exe"]);
    }

    #[test]
    fn shipping_executables_carry_platform_and_config() {
        let p = ProjectParams {
            client_configs: vec![Configuration::Shipping],
            ..params()
        };
        let contexts = create_deployment_contexts(&p, false).unwrap();
        assert_eq!(contexts[0].executable_names, ["Shooter-Win64-Shipping.exe"]);
        assert_eq!(contexts[1].executable_names, ["Shooter-Linux-Shipping"]);
    }

    #[test]
    fn missing_project_file_is_rejected_at_construction() {
        let p = ProjectParams {
            project_path: PathBuf::new(),
            ..params()
        };
        assert!(matches!(
            create_deployment_contexts(&p, false),
            Err(ConfigError::MissingProjectFile)
        ));
    }

    #[test]
    fn missing_stage_root_is_rejected_at_construction() {
        let p = ProjectParams {
            stage_directory: None,
            ..params()
        };
        assert!(matches!(
            create_deployment_contexts(&p, false),
            Err(ConfigError::MissingStageDirectory)
        ));
    }

    #[test]
    fn skip_stage_allows_a_missing_stage_root() {
        let p = ProjectParams {
            stage_directory: None,
            skip_stage: true,
            ..params()
        };
        let contexts = create_deployment_contexts(&p, false).unwrap();
        assert!(contexts.iter().all(|c| c.stage_directory.is_none()));
    }

    #[test]
    fn excluding_client_and_server_is_a_config_error() {
        let p = ProjectParams {
            no_client: true,
            dedicated_server: false,
            ..params()
        };
        assert!(matches!(
            create_deployment_contexts(&p, false),
            Err(ConfigError::NothingToStage)
        ));
    }

    #[test]
    fn gather_returns_empty_when_nothing_requested() {
        let p = ProjectParams {
            no_client: true,
            dedicated_server: false,
            ..params()
        };
        assert!(gather_deployment_contexts(&p).unwrap().is_empty());
    }

    #[test]
    fn gather_orders_client_before_server() {
        let contexts = gather_deployment_contexts(&params()).unwrap();
        let kinds: Vec<_> = contexts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [DeployKind::Client, DeployKind::Client, DeployKind::Server]
        );
    }
}
