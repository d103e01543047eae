use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use output::OutputFormat;

/// stagehand - build, stage, package, and deploy game targets
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an agenda of build targets and verify the build products
    Build {
        /// Target to build, as NAME:PLATFORM:CONFIG (repeatable)
        #[arg(short, long = "target", required = true)]
        targets: Vec<String>,

        /// Project file the targets belong to
        #[arg(long)]
        project: Option<PathBuf>,

        /// Build tool invoked per target
        #[arg(long, default_value = "BuildTool")]
        tool: String,

        /// Directory compiled binaries are written under
        #[arg(long)]
        output_dir: PathBuf,

        /// Engine root version files are stamped under
        #[arg(long, default_value = ".")]
        engine_root: PathBuf,

        /// Extra files to include, as BASE_DIR:GLOB (repeatable)
        #[arg(long = "extra-files")]
        extra_files: Vec<String>,

        /// Delete expected outputs before compiling
        #[arg(long)]
        clean: bool,

        /// Stamp version files before compiling
        #[arg(long)]
        update_version: bool,

        /// Changelist to stamp instead of the discovered one
        #[arg(long)]
        changelist: Option<u32>,
    },

    /// Package and/or deploy staged builds per platform
    Package {
        /// Project file being packaged
        #[arg(long)]
        project: PathBuf,

        /// Root directory staged output lives under
        #[arg(long)]
        stage_dir: Option<PathBuf>,

        /// Directory finished packages are archived into
        #[arg(long)]
        archive_dir: Option<PathBuf>,

        /// Client platform (repeatable)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,

        /// Server platform (repeatable)
        #[arg(long = "server-platform")]
        server_platforms: Vec<String>,

        /// Client configuration (repeatable; default development)
        #[arg(short, long = "config")]
        configs: Vec<String>,

        /// Client target name (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Server target name (repeatable)
        #[arg(long = "server-target")]
        server_targets: Vec<String>,

        /// Produce distributable packages
        #[arg(long)]
        package: bool,

        /// Deploy to connected devices
        #[arg(long)]
        deploy: bool,

        /// Skip the client entirely
        #[arg(long)]
        no_client: bool,

        /// Also process the dedicated server
        #[arg(long = "server")]
        dedicated_server: bool,

        /// Staged output is already in place
        #[arg(long)]
        skip_stage: bool,

        /// Device to deploy to (repeatable)
        #[arg(long = "device")]
        devices: Vec<String>,

        /// Changelist label for packages
        #[arg(long, default_value_t = 0)]
        changelist: u32,
    },

    /// List connected devices for a platform
    Devices {
        /// Platform to enumerate
        platform: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Copy built tool files into a directory, preserving relative layout
    CopyTools {
        /// Directory the files are copied from
        #[arg(long)]
        root: PathBuf,

        /// Directory the files are copied into
        #[arg(long)]
        out_dir: PathBuf,

        /// Glob selecting the files to copy, relative to the root
        #[arg(long, default_value = "**/*")]
        pattern: String,
    },

    /// Remove formal build directories older than the retention window
    CleanBuilds {
        /// Directory holding the build directories
        #[arg(long)]
        parent_dir: PathBuf,

        /// Glob matched against build directory names
        #[arg(long, default_value = "Build-*")]
        pattern: String,

        /// Retention window in days
        #[arg(long)]
        days: Option<u64>,
    },

    /// Sync a depot path through a temporary workspace
    Sync {
        /// Depot path to sync, e.g. //depot/game
        #[arg(long)]
        depot_path: String,

        /// Directory the files are synced into
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Show host and version information
    Info {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .init();
    if let Err(err) = run(cli) {
        output::print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            targets,
            project,
            tool,
            output_dir,
            engine_root,
            extra_files,
            clean,
            update_version,
            changelist,
        } => cmd::cmd_build(cmd::BuildArgs {
            targets,
            project,
            tool,
            output_dir,
            engine_root,
            extra_files,
            clean,
            update_version,
            changelist,
        }),
        Commands::Package {
            project,
            stage_dir,
            archive_dir,
            platforms,
            server_platforms,
            configs,
            targets,
            server_targets,
            package,
            deploy,
            no_client,
            dedicated_server,
            skip_stage,
            devices,
            changelist,
        } => cmd::cmd_package(cmd::PackageArgs {
            project,
            stage_dir,
            archive_dir,
            platforms,
            server_platforms,
            configs,
            targets,
            server_targets,
            package,
            deploy,
            no_client,
            dedicated_server,
            skip_stage,
            devices,
            changelist,
        }),
        Commands::Devices { platform, format } => cmd::cmd_devices(&platform, format),
        Commands::CopyTools {
            root,
            out_dir,
            pattern,
        } => cmd::cmd_copy_tools(&root, &out_dir, &pattern),
        Commands::CleanBuilds {
            parent_dir,
            pattern,
            days,
        } => cmd::cmd_clean_builds(&parent_dir, &pattern, days),
        Commands::Sync {
            depot_path,
            out_dir,
        } => cmd::cmd_sync(&depot_path, &out_dir),
        Commands::Info { format } => cmd::cmd_info(format),
    }
}
