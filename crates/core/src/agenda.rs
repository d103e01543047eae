//! Build agendas: the ordered list of targets for one orchestrator run.

use std::path::{Path, PathBuf};

use globset::Glob;
use walkdir::WalkDir;

use stagehand_platform::{Configuration, TargetPlatform};

use crate::error::BuildError;

/// One desired build unit: an optional project file, a target name, and the
/// platform/configuration pair to compile it for.
///
/// Constructed by a caller, consumed once by the orchestrator, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildTarget {
    /// Project file the target belongs to; `None` for engine/program targets.
    pub project_path: Option<PathBuf>,
    /// Name of the target.
    pub target_name: String,
    /// Platform to build.
    pub platform: TargetPlatform,
    /// Configuration to build.
    pub configuration: Configuration,
    /// Extra arguments passed through to the toolchain.
    pub extra_args: Vec<String>,
}

impl BuildTarget {
    pub fn new(
        target_name: impl Into<String>,
        platform: TargetPlatform,
        configuration: Configuration,
    ) -> Self {
        Self {
            project_path: None,
            target_name: target_name.into(),
            platform,
            configuration,
            extra_args: Vec::new(),
        }
    }

    pub fn with_project(mut self, project_path: impl Into<PathBuf>) -> Self {
        self.project_path = Some(project_path.into());
        self
    }

    /// Base file name of the primary binary this target produces, e.g.
    /// `Shooter-Android-Shipping`. Development builds omit the suffix.
    pub fn binary_name(&self) -> String {
        if self.configuration == Configuration::Development {
            self.target_name.clone()
        } else {
            format!(
                "{}-{}-{}",
                self.target_name, self.platform, self.configuration
            )
        }
    }
}

/// A glob-like inclusion rule for non-compiled artifacts (helper tool
/// binaries and their sidecars) that should ride along in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraFileRule {
    /// Directory the glob is evaluated under.
    pub base_dir: PathBuf,
    /// Glob pattern matched against paths relative to `base_dir`.
    pub pattern: String,
}

impl ExtraFileRule {
    pub fn new(base_dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Resolve the rule to concrete file paths, sorted for deterministic
    /// manifest order. A rule that matches nothing is a hard failure: a
    /// missing helper tool must not silently vanish from the build.
    pub fn resolve(&self) -> Result<Vec<PathBuf>, BuildError> {
        let glob = Glob::new(&self.pattern)
            .map_err(|e| BuildError::InvalidPattern {
                pattern: self.pattern.clone(),
                message: e.to_string(),
            })?
            .compile_matcher();

        let mut matches = Vec::new();
        for entry in WalkDir::new(&self.base_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = match entry.path().strip_prefix(&self.base_dir) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            if glob.is_match(relative) {
                matches.push(entry.path().to_path_buf());
            }
        }

        if matches.is_empty() {
            return Err(BuildError::ExtraFilesNotFound {
                base: self.base_dir.clone(),
                pattern: self.pattern.clone(),
            });
        }

        matches.sort();
        Ok(matches)
    }
}

/// An ordered collection of build targets plus extra-file rules.
///
/// Order is build order; duplicates are allowed but wasteful. Mutable only
/// during assembly, then handed to the orchestrator for a single build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildAgenda {
    targets: Vec<BuildTarget>,
    extra_files: Vec<ExtraFileRule>,
}

impl BuildAgenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target with the specified configuration.
    pub fn add_target(&mut self, target: BuildTarget) -> Result<(), BuildError> {
        if target.target_name.is_empty() {
            return Err(BuildError::EmptyTargetName);
        }
        self.targets.push(target);
        Ok(())
    }

    /// Add multiple targets with the same platform and configuration.
    pub fn add_targets(
        &mut self,
        target_names: &[&str],
        platform: TargetPlatform,
        configuration: Configuration,
    ) -> Result<(), BuildError> {
        for name in target_names {
            self.add_target(BuildTarget::new(*name, platform, configuration))?;
        }
        Ok(())
    }

    /// Add a rule including non-compiled files in the build products.
    pub fn add_extra_files(&mut self, rule: ExtraFileRule) {
        self.extra_files.push(rule);
    }

    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    pub fn extra_files(&self) -> &[ExtraFileRule] {
        &self.extra_files
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.extra_files.is_empty()
    }
}

/// Well-known auxiliary tools whose build products ride along with a build,
/// so callers don't need to know target names or file layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownTool {
    /// The bootstrap launcher that re-launches the automation tool itself.
    Launcher,
    /// The crash report uploader shipped next to packaged builds.
    CrashReporter,
}

impl KnownTool {
    pub const fn target_name(&self) -> &'static str {
        match self {
            KnownTool::Launcher => "StagehandLauncher",
            KnownTool::CrashReporter => "CrashReportClient",
        }
    }

    /// Glob covering the tool's runtime files: the executable plus optional
    /// `.pdb`/`.xml` sidecars.
    const fn sidecar_pattern(&self) -> &'static str {
        match self {
            KnownTool::Launcher => "StagehandLauncher*",
            KnownTool::CrashReporter => "CrashReportClient*",
        }
    }
}

/// Append one [`BuildTarget`] plus the tool's sidecar-file rule for a
/// well-known tool.
///
/// Idempotent with respect to the manifest: the manifest deduplicates paths,
/// so invoking this twice for the same tool/platform does not duplicate
/// manifest entries after the build.
pub fn add_tool_files_to_agenda(
    agenda: &mut BuildAgenda,
    tool: KnownTool,
    tool_output_dir: &Path,
    platform: TargetPlatform,
    configuration: Configuration,
) -> Result<(), BuildError> {
    agenda.add_target(BuildTarget::new(tool.target_name(), platform, configuration))?;
    agenda.add_extra_files(ExtraFileRule::new(tool_output_dir, tool.sidecar_pattern()));
    Ok(())
}
