use std::path::PathBuf;

use crate::xdg;

/// Get default cache directory
///
/// Honors `CSXDEPS_CACHE_DIR` first, then XDG conventions:
/// - Linux/Unix: $XDG_CACHE_HOME/csxdeps or ~/.cache/csxdeps
/// - macOS: ~/Library/Caches/csxdeps
/// - Windows: %LOCALAPPDATA%/csxdeps
pub fn default_cache_dir() -> PathBuf {
    match std::env::var("CSXDEPS_CACHE_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => xdg::cache_dir(),
    }
}
