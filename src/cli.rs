use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::script::OptimizationLevel;

/// csxdeps - C# script dependency resolution
///
/// csxdeps turns the package directives of `.csx` scripts into project
/// files that a restore tool understands, computes execution cache keys for
/// scripts with pinned dependencies, and picks the scripts bundled inside
/// restored packages.
#[derive(Parser, Debug)]
#[command(name = "csxdeps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "C# script dependency resolution", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration arguments shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(short = 'c', long, global = true, env = "CSXDEPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory for generated projects and compiled scripts
    #[arg(long, global = true, env = "CSXDEPS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Target framework of generated projects (e.g., "net8.0")
    #[arg(long, global = true, env = "CSXDEPS_TARGET_FRAMEWORK")]
    pub framework: Option<String>,

    /// Log level (trace|debug|info|warning|error|critical, or t|d|i|w|e|c)
    #[arg(long, global = true, env = "CSXDEPS_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the project file for a script or a directory of scripts
    Project(ProjectArgs),

    /// Generate the project file for inline script code
    Inline(InlineArgs),

    /// Compute the execution cache key for a script
    Hash(HashArgs),

    /// List the scripts a restored package contributes
    EntryPoints(EntryPointsArgs),

    /// Manage the execution cache
    Cache(CacheArgs),

    /// Configuration management utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Script file (omit when using --dir)
    #[arg(required_unless_present = "dir", conflicts_with = "dir")]
    pub script: Option<PathBuf>,

    /// Directory whose scripts form the project
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Explicit script files for directory mode (repeatable)
    #[arg(long = "file", requires = "dir")]
    pub files: Vec<PathBuf>,

    /// Generate a project even when the directory has no native .csproj
    #[arg(long, requires = "dir")]
    pub allow_without_csproj: bool,
}

#[derive(Parser, Debug)]
pub struct InlineArgs {
    /// Script code
    #[arg(long)]
    pub code: String,

    /// Directory relative `#load` paths resolve against (default: cwd)
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Project file name (default: from config, "script")
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Script file
    pub script: PathBuf,

    /// Arguments the script is invoked with (after --)
    #[arg(last = true)]
    pub script_args: Vec<String>,

    /// Optimization level (debug|release)
    #[arg(short = 'O', long, default_value = "debug")]
    pub optimization: OptimizationLevel,

    /// Package source (repeatable; replaces configured sources)
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Disable caching for this invocation
    #[arg(long)]
    pub no_cache: bool,

    /// Also report whether the execution cache holds this key
    #[arg(long)]
    pub check: bool,
}

#[derive(Parser, Debug)]
pub struct EntryPointsArgs {
    /// Root directory of the extracted package
    pub package_root: PathBuf,

    /// Framework bucket to activate when the package has no "any" bucket
    #[arg(long)]
    pub supported_framework: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List cached script artifacts
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Remove every cached script artifact
    Clean,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Validate {
        /// Path to config file
        path: PathBuf,
    },
    /// Print an example config file
    Generate,
    /// Show effective configuration (merged from all sources)
    Show,
}
