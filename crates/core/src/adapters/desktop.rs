//! Desktop adapter for Win64, Mac, and Linux.
//!
//! Desktop builds deploy straight from the staged directory, so packaging is
//! optional: a package here is a `.tar.gz` of the staged tree for archival
//! and distribution, and deployment copies the staged tree into destination
//! directories named by the device list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;
use walkdir::WalkDir;

use stagehand_platform::{HostInfo, PlatformError};

use crate::adapter::PlatformAdapter;
use crate::context::DeploymentContext;
use crate::params::ProjectParams;

#[derive(Debug, Default)]
pub struct DesktopAdapter;

impl DesktopAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn stage_dir(context: &DeploymentContext) -> Result<&Path, PlatformError> {
    context.stage_directory.as_deref().ok_or_else(|| {
        PlatformError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "no staged directory to operate on",
        ))
    })
}

fn copy_tree(from: &Path, to: &Path) -> Result<usize, io::Error> {
    let mut copied = 0;
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let dest = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

impl PlatformAdapter for DesktopAdapter {
    fn package(
        &self,
        _params: &ProjectParams,
        context: &DeploymentContext,
        working_changelist: u32,
    ) -> Result<(), PlatformError> {
        let stage = stage_dir(context)?;
        let stage_name = stage
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Staged");

        let out_dir = match &context.archive_directory {
            Some(dir) => dir.clone(),
            None => stage.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        fs::create_dir_all(&out_dir)?;

        let archive = out_dir.join(format!("{}-CL-{}.tar.gz", stage_name, working_changelist));
        let file = fs::File::create(&archive)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.append_dir_all(stage_name, stage)?;
        builder.into_inner()?.finish()?;

        info!(archive = %archive.display(), "desktop package written");
        Ok(())
    }

    fn deploy(
        &self,
        params: &ProjectParams,
        context: &DeploymentContext,
    ) -> Result<(), PlatformError> {
        let stage = stage_dir(context)?;
        if params.device_names.is_empty() {
            return Err(PlatformError::NoDevicesFound {
                platform: context.platform,
            });
        }

        // Desktop "devices" are destination directories.
        for device in &params.device_names {
            let dest = PathBuf::from(device);
            let copied = copy_tree(stage, &dest)?;
            info!(dest = %dest.display(), files = copied, "staged build deployed");
        }
        Ok(())
    }

    fn requires_package_to_deploy(&self) -> bool {
        false
    }

    fn connected_devices(&self, _params: &ProjectParams) -> Result<Vec<String>, PlatformError> {
        Ok(vec![HostInfo::current().hostname])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_platform::TargetPlatform;
    use tempfile::TempDir;

    use crate::context::DeployKind;

    fn context(stage: &Path, archive: Option<&Path>) -> DeploymentContext {
        DeploymentContext {
            platform: TargetPlatform::Linux,
            kind: DeployKind::Client,
            project_path: PathBuf::from("/projects/Shooter/Shooter.project"),
            stage_directory: Some(stage.to_path_buf()),
            archive_directory: archive.map(Path::to_path_buf),
            executable_names: vec!["Shooter".to_string()],
            deploy: false,
            package: true,
            skip_stage: false,
        }
    }

    #[test]
    fn package_writes_tarball_into_archive_directory() {
        let temp = TempDir::new().unwrap();
        let stage = temp.path().join("Linux");
        fs::create_dir_all(&stage).unwrap();
        fs::write(stage.join("Shooter"), b"bin").unwrap();
        let archive_dir = temp.path().join("archive");

        let adapter = DesktopAdapter::new();
        adapter
            .package(
                &ProjectParams::default(),
                &context(&stage, Some(&archive_dir)),
                777,
            )
            .unwrap();

        assert!(archive_dir.join("Linux-CL-777.tar.gz").exists());
    }

    #[test]
    fn deploy_copies_staged_tree_preserving_layout() {
        let temp = TempDir::new().unwrap();
        let stage = temp.path().join("Linux");
        fs::create_dir_all(stage.join("Content")).unwrap();
        fs::write(stage.join("Shooter"), b"bin").unwrap();
        fs::write(stage.join("Content/pak0.bin"), b"pak").unwrap();
        let dest = temp.path().join("device");

        let params = ProjectParams {
            device_names: vec![dest.to_string_lossy().into_owned()],
            ..Default::default()
        };
        DesktopAdapter::new()
            .deploy(&params, &context(&stage, None))
            .unwrap();

        assert!(dest.join("Shooter").exists());
        assert!(dest.join("Content/pak0.bin").exists());
    }

    #[test]
    fn deploy_without_destinations_reports_no_devices() {
        let temp = TempDir::new().unwrap();
        let stage = temp.path().join("Linux");
        fs::create_dir_all(&stage).unwrap();

        let err = DesktopAdapter::new()
            .deploy(&ProjectParams::default(), &context(&stage, None))
            .unwrap_err();
        assert!(matches!(err, PlatformError::NoDevicesFound { .. }));
    }

    #[test]
    fn desktop_can_deploy_without_packaging() {
        assert!(!DesktopAdapter::new().requires_package_to_deploy());
    }
}
