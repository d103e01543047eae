//! Project packaging parameters.
//!
//! `ProjectParams` is the validated configuration object driving one
//! package/deploy invocation. [`ProjectParams::validate_and_log`] must
//! succeed before any deployment context is built; validation is eager and
//! happens before any I/O side effect.

use std::path::PathBuf;

use tracing::info;

use stagehand_platform::{Configuration, TargetPlatform};

use crate::error::ConfigError;

/// Read-only input to the packaging pipeline.
#[derive(Debug, Clone)]
pub struct ProjectParams {
    /// The project file being packaged.
    pub project_path: PathBuf,

    /// Root directory staged output is written under.
    pub stage_directory: Option<PathBuf>,

    /// Directory finished packages are archived into.
    pub archive_directory: Option<PathBuf>,

    /// Platforms to stage/package client builds for.
    pub client_platforms: Vec<TargetPlatform>,

    /// Platforms to stage/package dedicated server builds for.
    pub server_platforms: Vec<TargetPlatform>,

    /// Configurations staged for the client.
    pub client_configs: Vec<Configuration>,

    /// Configurations staged for the server.
    pub server_configs: Vec<Configuration>,

    /// Client target names.
    pub client_targets: Vec<String>,

    /// Dedicated server target names.
    pub server_targets: Vec<String>,

    /// Skip the client entirely.
    pub no_client: bool,

    /// Also stage/package the dedicated server.
    pub dedicated_server: bool,

    /// Produce distributable packages.
    pub package: bool,

    /// Push packages/staged builds to connected devices.
    pub deploy: bool,

    /// Leave staged output as-is; go straight to packaging.
    pub skip_stage: bool,

    /// Devices to deploy to. Empty means "whatever is connected".
    pub device_names: Vec<String>,
}

impl Default for ProjectParams {
    fn default() -> Self {
        Self {
            project_path: PathBuf::new(),
            stage_directory: None,
            archive_directory: None,
            client_platforms: Vec::new(),
            server_platforms: Vec::new(),
            client_configs: vec![Configuration::Development],
            server_configs: vec![Configuration::Development],
            client_targets: Vec::new(),
            server_targets: Vec::new(),
            no_client: false,
            dedicated_server: false,
            package: false,
            deploy: false,
            skip_stage: false,
            device_names: Vec::new(),
        }
    }
}

impl ProjectParams {
    /// Whether any client work is requested.
    pub fn wants_client(&self) -> bool {
        !self.no_client
    }

    /// Whether any server work is requested.
    pub fn wants_server(&self) -> bool {
        self.dedicated_server
    }

    /// Validate required fields and flag combinations, logging a summary on
    /// success. Must pass before any [`crate::DeploymentContext`] is built;
    /// a failure aborts the pipeline before any side effect.
    pub fn validate_and_log(&self) -> Result<(), ConfigError> {
        if self.project_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingProjectFile);
        }

        let wants_work = self.wants_client() || self.wants_server();
        if wants_work && !self.skip_stage && self.stage_directory.is_none() {
            return Err(ConfigError::MissingStageDirectory);
        }

        if self.wants_client() && self.client_platforms.is_empty() {
            return Err(ConfigError::NoPlatforms { kind: "client" });
        }
        if self.wants_server() && self.server_platforms.is_empty() {
            return Err(ConfigError::NoPlatforms { kind: "server" });
        }

        if !wants_work && (self.package || self.deploy) {
            return Err(ConfigError::Contradiction(
                "package/deploy requested but both client and server are excluded".to_string(),
            ));
        }

        info!(
            project = %self.project_path.display(),
            client = self.wants_client(),
            server = self.wants_server(),
            package = self.package,
            deploy = self.deploy,
            skip_stage = self.skip_stage,
            "project params validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> ProjectParams {
        ProjectParams {
            project_path: PathBuf::from("/projects/Shooter/Shooter.project"),
            stage_directory: Some(PathBuf::from("/builds/staged")),
            client_platforms: vec![TargetPlatform::Linux],
            server_platforms: vec![TargetPlatform::Linux],
            client_targets: vec!["Shooter".to_string()],
            server_targets: vec!["ShooterServer".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn valid_params_pass() {
        valid_params().validate_and_log().unwrap();
    }

    #[test]
    fn missing_project_file_is_rejected() {
        let params = ProjectParams {
            project_path: PathBuf::new(),
            ..valid_params()
        };
        assert!(matches!(
            params.validate_and_log(),
            Err(ConfigError::MissingProjectFile)
        ));
    }

    #[test]
    fn missing_stage_directory_is_rejected() {
        let params = ProjectParams {
            stage_directory: None,
            ..valid_params()
        };
        assert!(matches!(
            params.validate_and_log(),
            Err(ConfigError::MissingStageDirectory)
        ));
    }

    #[test]
    fn skip_stage_does_not_require_stage_directory() {
        let params = ProjectParams {
            stage_directory: None,
            skip_stage: true,
            ..valid_params()
        };
        params.validate_and_log().unwrap();
    }

    #[test]
    fn client_without_platforms_is_rejected() {
        let params = ProjectParams {
            client_platforms: Vec::new(),
            ..valid_params()
        };
        assert!(matches!(
            params.validate_and_log(),
            Err(ConfigError::NoPlatforms { kind: "client" })
        ));
    }

    #[test]
    fn deploy_with_nothing_requested_is_contradictory() {
        let params = ProjectParams {
            no_client: true,
            dedicated_server: false,
            deploy: true,
            ..valid_params()
        };
        assert!(matches!(
            params.validate_and_log(),
            Err(ConfigError::Contradiction(_))
        ));
    }

    #[test]
    fn excluding_everything_without_work_is_allowed() {
        // "Nothing requested" is a no-op for the driver, not a config error.
        let params = ProjectParams {
            no_client: true,
            dedicated_server: false,
            ..valid_params()
        };
        params.validate_and_log().unwrap();
    }
}
