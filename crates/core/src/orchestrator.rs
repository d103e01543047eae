//! Build orchestration for stagehand.
//!
//! The orchestrator consumes a [`BuildAgenda`], drives the toolchain over
//! each target in order, and accumulates a [`BuildProductManifest`] of
//! everything produced. The flow for one `build` call:
//!
//! 1. Stamp version files (when requested)
//! 2. Per target, in agenda order: delete stale products, compile, record
//!    products and sidecars
//! 3. Resolve extra-file rules into the manifest
//!
//! A single target's compile failure is fatal to the whole call; the
//! manifest accumulated so far is discarded with the error. Partially-built
//! agendas must never be treated as usable.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use stagehand_platform::{process, PlatformError};

use crate::agenda::{BuildAgenda, BuildTarget};
use crate::error::BuildError;
use crate::manifest::BuildProductManifest;
use crate::version::{update_version_files, BuildEnvironment, VersionOverrides};

/// The seam between orchestration and the native compiler.
///
/// One implementation wraps the real platform toolchain; tests substitute a
/// fake that writes products into a temp directory.
pub trait Toolchain {
    /// Compile one target, returning the primary product paths it produced.
    fn compile(&self, target: &BuildTarget) -> Result<Vec<PathBuf>, PlatformError>;

    /// Paths the target is expected to produce, used to delete stale output
    /// before building so a stale artifact cannot masquerade as fresh.
    fn expected_outputs(&self, target: &BuildTarget) -> Vec<PathBuf>;
}

/// Toolchain implementation that shells out to the configured native build
/// tool, one blocking invocation per target.
pub struct NativeToolchain {
    /// The build tool executable.
    pub tool: String,
    /// Directory compiled binaries land in, per platform subdirectory.
    pub output_root: PathBuf,
}

impl NativeToolchain {
    pub fn new(tool: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            output_root: output_root.into(),
        }
    }

    fn output_dir(&self, target: &BuildTarget) -> PathBuf {
        self.output_root.join(target.platform.as_str())
    }
}

impl Toolchain for NativeToolchain {
    fn compile(&self, target: &BuildTarget) -> Result<Vec<PathBuf>, PlatformError> {
        let mut args = vec![
            target.target_name.clone(),
            target.platform.to_string(),
            target.configuration.to_string(),
        ];
        if let Some(project) = &target.project_path {
            args.push(format!("-project={}", project.display()));
        }
        args.extend(target.extra_args.iter().cloned());

        process::run_tool(&self.tool, &args)?;

        Ok(self.expected_outputs(target))
    }

    fn expected_outputs(&self, target: &BuildTarget) -> Vec<PathBuf> {
        let binary = format!("{}{}", target.binary_name(), target.platform.exe_extension());
        vec![self.output_dir(target).join(binary)]
    }
}

/// Options for one orchestrator build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Remove stale output at each target's expected path before building.
    pub delete_existing_products: bool,
    /// Stamp version files before compilation starts.
    pub update_version_files: bool,
    /// Overrides for the stamping pass; ignored unless stamping is enabled.
    pub version_overrides: VersionOverrides,
}

/// Drives a [`BuildAgenda`] through the toolchain and accumulates the
/// verified build-product manifest. One invocation owns its manifest; no
/// internal parallelism, no retries.
pub struct BuildOrchestrator<T: Toolchain> {
    toolchain: T,
    env: BuildEnvironment,
    engine_root: PathBuf,
}

impl<T: Toolchain> BuildOrchestrator<T> {
    pub fn new(toolchain: T, env: BuildEnvironment, engine_root: impl Into<PathBuf>) -> Self {
        Self {
            toolchain,
            env,
            engine_root: engine_root.into(),
        }
    }

    /// Build every target in agenda order and collect the product manifest.
    ///
    /// The first compile failure aborts the call. Callers must still run
    /// [`crate::manifest::check_build_products`] before trusting the result;
    /// that check is the integrity gate, kept separate so callers can insert
    /// steps (symbol upload, signing) between build and verification.
    pub fn build(
        &self,
        agenda: &BuildAgenda,
        options: &BuildOptions,
    ) -> Result<BuildProductManifest, BuildError> {
        info!(
            targets = agenda.targets().len(),
            extra_rules = agenda.extra_files().len(),
            "********** BUILD STARTED **********"
        );

        if options.update_version_files {
            update_version_files(&self.env, &options.version_overrides, &self.engine_root)?;
        }

        let mut manifest = BuildProductManifest::new();

        for target in agenda.targets() {
            if options.delete_existing_products {
                self.delete_stale_products(target);
            }

            info!(
                target = %target.target_name,
                platform = %target.platform,
                configuration = %target.configuration,
                "building target"
            );

            let products = self
                .toolchain
                .compile(target)
                .map_err(|source| BuildError::Compile {
                    target: target.target_name.clone(),
                    source,
                })?;

            for product in products {
                manifest.add_with_sidecars(product)?;
            }
        }

        for rule in agenda.extra_files() {
            for path in rule.resolve()? {
                manifest.add(path)?;
            }
        }

        info!(products = manifest.len(), "********** BUILD COMPLETED **********");
        Ok(manifest)
    }

    fn delete_stale_products(&self, target: &BuildTarget) {
        for path in self.toolchain.expected_outputs(target) {
            if path.exists() {
                debug!(product = %path.display(), "deleting stale build product");
                if let Err(e) = remove_path(&path) {
                    warn!(product = %path.display(), error = %e, "failed to delete stale product");
                }
            }
        }
    }
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::ExtraFileRule;
    use crate::manifest::check_build_products;
    use stagehand_platform::{Configuration, TargetPlatform};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Toolchain fake: "compiles" by writing the binary (and optionally a
    /// sidecar) into a directory, or fails for targets in a deny list.
    struct FakeToolchain {
        out_dir: PathBuf,
        fail_targets: Vec<String>,
        with_sidecars: bool,
        compiled: RefCell<Vec<String>>,
    }

    impl FakeToolchain {
        fn new(out_dir: &Path) -> Self {
            Self {
                out_dir: out_dir.to_path_buf(),
                fail_targets: Vec::new(),
                with_sidecars: false,
                compiled: RefCell::new(Vec::new()),
            }
        }
    }

    impl Toolchain for FakeToolchain {
        fn compile(&self, target: &BuildTarget) -> Result<Vec<PathBuf>, PlatformError> {
            if self.fail_targets.contains(&target.target_name) {
                return Err(PlatformError::ExternalTool {
                    tool: "fake-compiler".to_string(),
                    code: 1,
                });
            }
            self.compiled.borrow_mut().push(target.target_name.clone());

            let binary = self.out_dir.join(target.binary_name());
            std::fs::write(&binary, b"binary").unwrap();
            if self.with_sidecars {
                std::fs::write(binary.with_extension("pdb"), b"symbols").unwrap();
            }
            Ok(vec![binary])
        }

        fn expected_outputs(&self, target: &BuildTarget) -> Vec<PathBuf> {
            vec![self.out_dir.join(target.binary_name())]
        }
    }

    fn test_env() -> BuildEnvironment {
        BuildEnvironment {
            changelist: 1,
            compatible_changelist: 1,
            branch: "main".to_string(),
            build_string: None,
            machine_name: "test".to_string(),
        }
    }

    fn orchestrator(temp: &TempDir) -> BuildOrchestrator<FakeToolchain> {
        BuildOrchestrator::new(FakeToolchain::new(temp.path()), test_env(), temp.path())
    }

    #[test]
    fn build_produces_at_least_one_product_per_target() {
        let temp = TempDir::new().unwrap();
        let mut agenda = BuildAgenda::new();
        agenda
            .add_targets(
                &["Game", "Editor"],
                TargetPlatform::Linux,
                Configuration::Development,
            )
            .unwrap();

        let manifest = orchestrator(&temp)
            .build(&agenda, &BuildOptions::default())
            .unwrap();

        assert!(manifest.len() >= 2);
        for product in manifest.iter() {
            assert!(product.exists());
        }
        check_build_products(&manifest).unwrap();
    }

    #[test]
    fn compile_failure_is_fatal_and_discards_manifest() {
        let temp = TempDir::new().unwrap();
        let mut toolchain = FakeToolchain::new(temp.path());
        toolchain.fail_targets.push("Broken".to_string());
        let orchestrator = BuildOrchestrator::new(toolchain, test_env(), temp.path());

        let mut agenda = BuildAgenda::new();
        agenda
            .add_targets(
                &["Game", "Broken", "Editor"],
                TargetPlatform::Linux,
                Configuration::Development,
            )
            .unwrap();

        let result = orchestrator.build(&agenda, &BuildOptions::default());
        assert!(matches!(
            result,
            Err(BuildError::Compile { ref target, .. }) if target == "Broken"
        ));
    }

    #[test]
    fn fail_fast_skips_remaining_targets() {
        let temp = TempDir::new().unwrap();
        let mut toolchain = FakeToolchain::new(temp.path());
        toolchain.fail_targets.push("Broken".to_string());
        let orchestrator = BuildOrchestrator::new(toolchain, test_env(), temp.path());

        let mut agenda = BuildAgenda::new();
        agenda
            .add_targets(
                &["Game", "Broken", "Editor"],
                TargetPlatform::Linux,
                Configuration::Development,
            )
            .unwrap();

        let _ = orchestrator.build(&agenda, &BuildOptions::default());
        assert_eq!(*orchestrator.toolchain.compiled.borrow(), vec!["Game"]);
    }

    #[test]
    fn sidecars_ride_along_in_the_manifest() {
        let temp = TempDir::new().unwrap();
        let mut toolchain = FakeToolchain::new(temp.path());
        toolchain.with_sidecars = true;
        let orchestrator = BuildOrchestrator::new(toolchain, test_env(), temp.path());

        let mut agenda = BuildAgenda::new();
        agenda
            .add_target(BuildTarget::new(
                "Game",
                TargetPlatform::Linux,
                Configuration::Development,
            ))
            .unwrap();

        let manifest = orchestrator.build(&agenda, &BuildOptions::default()).unwrap();
        assert_eq!(manifest.len(), 2);
        assert!(manifest.contains(&temp.path().join("Game.pdb")));
    }

    #[test]
    fn extra_file_rules_land_in_manifest() {
        let temp = TempDir::new().unwrap();
        let tools = temp.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        std::fs::write(tools.join("helper.exe"), b"x").unwrap();
        std::fs::write(tools.join("helper.xml"), b"x").unwrap();

        let mut agenda = BuildAgenda::new();
        agenda.add_extra_files(ExtraFileRule::new(&tools, "helper*"));

        let manifest = orchestrator(&temp)
            .build(&agenda, &BuildOptions::default())
            .unwrap();
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn tool_helper_twice_does_not_duplicate_manifest_paths() {
        use crate::agenda::{add_tool_files_to_agenda, KnownTool};

        let temp = TempDir::new().unwrap();
        let tools = temp.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        std::fs::write(tools.join("StagehandLauncher.exe"), b"x").unwrap();

        let mut agenda = BuildAgenda::new();
        for _ in 0..2 {
            add_tool_files_to_agenda(
                &mut agenda,
                KnownTool::Launcher,
                &tools,
                TargetPlatform::Linux,
                Configuration::Development,
            )
            .unwrap();
        }

        let manifest = orchestrator(&temp)
            .build(&agenda, &BuildOptions::default())
            .unwrap();

        // Two targets compiled (wasteful but allowed), but the launcher's
        // files appear exactly once.
        let launcher_entries = manifest
            .iter()
            .filter(|p| p.ends_with("StagehandLauncher.exe"))
            .count();
        assert_eq!(launcher_entries, 1);
    }

    #[test]
    fn stale_products_are_deleted_before_build() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("Game");
        std::fs::write(&stale, b"stale").unwrap();

        let mut agenda = BuildAgenda::new();
        agenda
            .add_target(BuildTarget::new(
                "Game",
                TargetPlatform::Linux,
                Configuration::Development,
            ))
            .unwrap();

        let options = BuildOptions {
            delete_existing_products: true,
            ..Default::default()
        };
        let manifest = orchestrator(&temp).build(&agenda, &options).unwrap();

        // The product present now is the freshly written one.
        assert_eq!(std::fs::read(&stale).unwrap(), b"binary");
        assert!(manifest.contains(&stale));
    }

    #[test]
    fn version_files_are_stamped_when_requested() {
        let temp = TempDir::new().unwrap();
        let agenda = BuildAgenda::new();
        let options = BuildOptions {
            update_version_files: true,
            ..Default::default()
        };

        orchestrator(&temp).build(&agenda, &options).unwrap();
        assert!(temp.path().join("Build/Build.version").exists());
    }

    #[test]
    fn native_toolchain_expected_outputs_use_platform_layout() {
        let toolchain = NativeToolchain::new("buildtool", "/out");
        let target = BuildTarget::new("Game", TargetPlatform::Win64, Configuration::Shipping);
        let outputs = toolchain.expected_outputs(&target);
        assert_eq!(
            outputs,
            vec![PathBuf::from("/out/Win64/Game-Win64-Shipping.exe")]
        );
    }
}
