/// Configuration merger: CLI args > Env vars > Config file > Defaults
///
/// This module handles merging configuration from multiple sources:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (folded into the CLI args by clap)
/// 3. Configuration file
/// 4. Built-in defaults (lowest priority)
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::config::CsxdepsConfig;
use crate::logging::Verbosity;
use crate::storage::default_cache_dir;

/// Effective configuration for every command
#[derive(Debug, Clone, Serialize)]
pub struct MergedConfig {
    pub cache_dir: PathBuf,
    pub target_framework: String,
    pub sdk: String,
    pub project_name: String,
    pub supported_framework: String,
    pub package_sources: Vec<String>,
    pub log_level: String,
}

impl MergedConfig {
    /// Merge configuration from CLI args and config file
    /// Precedence: CLI > env (already handled by clap) > config file > defaults
    pub fn merge(args: &GlobalArgs, file_config: Option<CsxdepsConfig>) -> Self {
        let file = file_config.unwrap_or_default();

        Self {
            cache_dir: args
                .cache_dir
                .clone()
                .or_else(|| file.cache.dir.as_ref().map(PathBuf::from))
                .unwrap_or_else(default_cache_dir),
            target_framework: args
                .framework
                .clone()
                .unwrap_or(file.project.target_framework),
            sdk: file.project.sdk,
            project_name: file.project.name,
            supported_framework: file.packages.supported_framework,
            package_sources: file.packages.sources,
            log_level: args.log_level.clone().unwrap_or(file.log.level),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_alias(&self.log_level)
    }
}
