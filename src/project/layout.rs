/// Deterministic locations for generated project descriptors
///
/// Layout: `<root>/<script dir without root>/<target framework>/<name>.csproj`
///
/// Path computation never touches the filesystem, so callers can predict
/// where a descriptor will be written before anything is created.
use std::path::{Path, PathBuf};

use crate::storage::path_without_root;

pub const DEFAULT_PROJECT_NAME: &str = "script";
const PROJECT_EXTENSION: &str = "csproj";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout nested under a cache directory (`<cache>/projects`)
    pub fn under_cache_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join("projects"))
    }

    /// Directory holding descriptors generated for `dir` and `target_framework`
    pub fn project_dir(&self, dir: &Path, target_framework: &str) -> PathBuf {
        self.root
            .join(path_without_root(dir))
            .join(sanitize(target_framework))
    }

    /// Path of the descriptor for `dir` and `target_framework`
    ///
    /// A custom `name` replaces the default `script`; a name without the
    /// `.csproj` extension gets one appended.
    pub fn descriptor_path(&self, dir: &Path, target_framework: &str, name: Option<&str>) -> PathBuf {
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_PROJECT_NAME);
        let has_extension = Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION));
        let file_name = if has_extension {
            name.to_string()
        } else {
            format!("{}.{}", name, PROJECT_EXTENSION)
        };
        self.project_dir(dir, target_framework).join(file_name)
    }
}

/// Keep framework monikers usable as a single path component
fn sanitize(target_framework: &str) -> String {
    let cleaned: String = target_framework
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "default".to_string()
    } else {
        cleaned
    }
}
