// Library interface for csxdeps
// The binary is a thin dispatcher over these modules

pub mod cli;
pub mod cli_utils;
pub mod commands;
pub mod config;
pub mod config_discovery;
pub mod logging;
pub mod merger;
pub mod project;
pub mod script;
pub mod storage;
pub mod xdg;

// Re-export commonly used types
pub use config::CsxdepsConfig;
pub use config_discovery::{discover_config, load_config_with_discovery, LoadedConfig};
pub use project::{PackageReference, PackageVersionSpec, ProjectDescriptor, ProjectProvider};
pub use script::{try_create_hash, BundledScriptResolver, ExecutionCache, HashOutcome};
pub use storage::default_cache_dir;
