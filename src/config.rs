use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::project::layout::DEFAULT_PROJECT_NAME;
use crate::project::DEFAULT_SDK;
use crate::script::bundled::DEFAULT_SUPPORTED_FRAMEWORK;

/// Complete csxdeps configuration (loaded from TOML file)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CsxdepsConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub packages: PackagesConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Generated project defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Target framework written into generated projects (e.g., "net8.0")
    #[serde(default = "default_target_framework")]
    pub target_framework: String,

    /// SDK used when no script declares one
    #[serde(default = "default_sdk")]
    pub sdk: String,

    /// Default project file name (without extension)
    #[serde(default = "default_project_name")]
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            target_framework: default_target_framework(),
            sdk: default_sdk(),
            name: default_project_name(),
        }
    }
}

/// Package resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Framework bucket activated for scripts bundled in packages
    #[serde(default = "default_supported_framework")]
    pub supported_framework: String,

    /// Package sources passed to restore (also part of the execution cache key)
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            supported_framework: default_supported_framework(),
            sources: Vec::new(),
        }
    }
}

/// Local cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Cache directory path (defaults to the XDG cache directory)
    #[serde(default)]
    pub dir: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Verbosity alias: trace, debug, info, warning, error, critical
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_target_framework() -> String {
    "net8.0".to_string()
}

fn default_sdk() -> String {
    DEFAULT_SDK.to_string()
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_supported_framework() -> String {
    DEFAULT_SUPPORTED_FRAMEWORK.to_string()
}

fn default_log_level() -> String {
    "warning".to_string()
}

impl CsxdepsConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: CsxdepsConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Generate example configuration as TOML string
    pub fn example() -> Result<String> {
        let config = CsxdepsConfig {
            packages: PackagesConfig {
                sources: vec!["https://api.nuget.org/v3/index.json".to_string()],
                ..Default::default()
            },
            cache: CacheConfig {
                dir: Some(".csxdeps/cache".to_string()),
            },
            ..Default::default()
        };

        toml::to_string_pretty(&config).context("Failed to render example configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.target_framework.trim().is_empty() {
            anyhow::bail!("project.target_framework must not be empty");
        }

        if self.project.target_framework.contains(['/', '\\']) {
            anyhow::bail!(
                "project.target_framework must be a framework moniker, got: {}",
                self.project.target_framework
            );
        }

        if self.packages.supported_framework.trim().is_empty() {
            anyhow::bail!("packages.supported_framework must not be empty");
        }

        if let Some(dir) = &self.cache.dir {
            if dir.trim().is_empty() {
                anyhow::bail!("cache.dir must not be empty when set");
            }
        }

        Ok(())
    }
}
