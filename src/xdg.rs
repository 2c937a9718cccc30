//! XDG Base Directory support for csxdeps
//!
//! Follows the XDG Base Directory Specification:
//! - https://specifications.freedesktop.org/basedir-spec/basedir-spec-latest.html
//!
//! Directory structure:
//! - `$XDG_CACHE_HOME/csxdeps/` (default: `~/.cache/csxdeps/`) - Generated projects and compiled scripts
//! - `$XDG_CONFIG_HOME/csxdeps/` (default: `~/.config/csxdeps/`) - Global configuration

use std::path::PathBuf;

const APP_DIR: &str = "csxdeps";

/// Get the csxdeps cache directory
///
/// Respects XDG_CACHE_HOME environment variable.
/// Falls back to the platform cache directory, then `$HOME/.cache/csxdeps`.
///
/// # Example
/// ```
/// let cache_dir = csxdeps::xdg::cache_dir();
/// // Unix: ~/.cache/csxdeps or $XDG_CACHE_HOME/csxdeps
/// ```
pub fn cache_dir() -> PathBuf {
    if let Some(xdg_cache) = non_empty_var("XDG_CACHE_HOME") {
        PathBuf::from(xdg_cache).join(APP_DIR)
    } else if let Some(cache) = dirs::cache_dir() {
        cache.join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        // XDG default: $HOME/.cache
        home.join(".cache").join(APP_DIR)
    } else {
        PathBuf::from(".csxdeps-cache")
    }
}

/// Get the csxdeps configuration directory
///
/// Respects XDG_CONFIG_HOME environment variable.
/// Falls back to `$HOME/.config/csxdeps`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(xdg_config) = non_empty_var("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg_config).join(APP_DIR))
    } else {
        dirs::home_dir().map(|home| home.join(".config").join(APP_DIR))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
