use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::CsxdepsConfig;
use crate::xdg;

pub const CONFIG_FILE_NAME: &str = "csxdeps.toml";
const GLOBAL_CONFIG_FILE_NAME: &str = "config.toml";

/// Discovers csxdeps configuration by traversing up the directory tree
pub fn discover_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Ok(Some(config_path));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    // Fallback to global config
    if let Some(config_dir) = xdg::config_dir() {
        let global_config = config_dir.join(GLOBAL_CONFIG_FILE_NAME);
        if global_config.is_file() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// A configuration file together with the path it was read from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: CsxdepsConfig,
}

/// Loads configuration with auto-discovery support
///
/// If `explicit_path` is provided, loads config from that path (and fails if
/// it cannot be read). Otherwise, auto-discovers config by traversing up the
/// directory tree from cwd.
///
/// Returns Ok(None) if no config is found (neither explicit nor discovered).
/// Nothing is logged here: this runs before the subscriber exists, so the
/// caller reports `path` once logging is up.
pub fn load_config_with_discovery(explicit_path: Option<&Path>) -> Result<Option<LoadedConfig>> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => {
            let current_dir = std::env::current_dir()
                .context("Failed to get current directory for config discovery")?;
            match discover_config(&current_dir)? {
                Some(path) => path,
                None => return Ok(None),
            }
        }
    };

    let config = CsxdepsConfig::from_file(&path)?;
    Ok(Some(LoadedConfig { path, config }))
}
