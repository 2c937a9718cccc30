/// Script files bundled inside restored packages
///
/// Packages ship scripts under
/// `contentFiles/csx/<framework>/**/*.csx` (or the older `content/csx/...`
/// layout). The directory after `csx` is the bucket: either `any` or a
/// target framework moniker. Only one bucket is activated:
///
/// 1. `any`, if present, regardless of other buckets
/// 2. otherwise the bucket named after the supported framework
/// 3. otherwise nothing
///
/// Within the bucket a single `main.csx` is the entry point; a lone file is
/// its own entry point; several files without a `main.csx` are all returned.
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const ANY_FRAMEWORK: &str = "any";
pub const DEFAULT_SUPPORTED_FRAMEWORK: &str = "netstandard2.0";
const ENTRY_POINT_NAME: &str = "main.csx";
const SCRIPT_ROOT: &str = "csx";
/// Content roots in order of preference
const CONTENT_ROOTS: [&str; 2] = ["contentFiles", "content"];

#[derive(Debug, Clone)]
pub struct BundledScriptResolver {
    supported_framework: String,
}

impl Default for BundledScriptResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORTED_FRAMEWORK)
    }
}

impl BundledScriptResolver {
    pub fn new(supported_framework: impl Into<String>) -> Self {
        Self {
            supported_framework: supported_framework.into(),
        }
    }

    /// Scripts to activate for the package extracted at `package_root`
    ///
    /// A missing package root yields an empty result.
    pub fn resolve(&self, package_root: &Path) -> io::Result<Vec<PathBuf>> {
        if !package_root.is_dir() {
            return Ok(Vec::new());
        }

        let mut relative_paths = Vec::new();
        for entry in WalkDir::new(package_root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(package_root) {
                relative_paths.push(relative.to_string_lossy().into_owned());
            }
        }

        let selected: Vec<PathBuf> = select_entry_points(&relative_paths, &self.supported_framework)
            .into_iter()
            .map(|relative| package_root.join(to_native(relative)))
            .collect();

        tracing::debug!(
            operation = "bundled.resolve",
            package = %package_root.display(),
            supported_framework = %self.supported_framework,
            selected = selected.len(),
            "resolved bundled scripts"
        );

        Ok(selected)
    }
}

/// Location of a bundled script inside a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BundledScript<'a> {
    pub root: &'a str,
    pub bucket: &'a str,
    pub file_name: &'a str,
}

/// Classify a package-relative path; both `/` and `\` separate segments
pub(crate) fn classify(relative_path: &str) -> Option<BundledScript<'_>> {
    let segments: Vec<&str> = relative_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();

    // root / csx / bucket / ... / file.csx
    if segments.len() < 4 {
        return None;
    }
    let root = CONTENT_ROOTS
        .iter()
        .copied()
        .find(|r| r.eq_ignore_ascii_case(segments[0]))?;
    if !segments[1].eq_ignore_ascii_case(SCRIPT_ROOT) {
        return None;
    }
    let file_name = *segments.last()?;
    let is_script = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_ROOT));
    if !is_script {
        return None;
    }

    Some(BundledScript {
        root,
        bucket: segments[2],
        file_name,
    })
}

/// Pick the scripts to activate from package-relative paths
pub(crate) fn select_entry_points<'a>(
    relative_paths: &'a [String],
    supported_framework: &str,
) -> Vec<&'a str> {
    let classified: Vec<(&'a str, BundledScript<'a>)> = relative_paths
        .iter()
        .filter_map(|p| classify(p).map(|script| (p.as_str(), script)))
        .collect();

    // contentFiles wins; content is only a fallback
    let Some(root) = CONTENT_ROOTS
        .iter()
        .copied()
        .find(|root| classified.iter().any(|(_, s)| s.root == *root))
    else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<String, Vec<(&'a str, BundledScript<'a>)>> = BTreeMap::new();
    for (path, script) in classified.into_iter().filter(|(_, s)| s.root == root) {
        buckets
            .entry(script.bucket.to_lowercase())
            .or_default()
            .push((path, script));
    }

    let Some(mut files) = buckets
        .remove(ANY_FRAMEWORK)
        .or_else(|| buckets.remove(&supported_framework.to_lowercase()))
    else {
        return Vec::new();
    };
    files.sort_by(|a, b| a.0.cmp(b.0));

    let mains: Vec<&'a str> = files
        .iter()
        .filter(|(_, s)| s.file_name.eq_ignore_ascii_case(ENTRY_POINT_NAME))
        .map(|(p, _)| *p)
        .collect();

    if mains.len() == 1 {
        return mains;
    }
    files.into_iter().map(|(p, _)| p).collect()
}

fn to_native(relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_both_separators() {
        let unix = classify("contentFiles/csx/netstandard2.0/main.csx").unwrap();
        let windows = classify("contentFiles\\csx\\netstandard2.0\\main.csx").unwrap();
        assert_eq!(unix, windows);
        assert_eq!(unix.bucket, "netstandard2.0");
    }

    #[test]
    fn test_classify_rejects_other_layouts() {
        assert!(classify("lib/netstandard2.0/a.dll").is_none());
        assert!(classify("contentFiles/cs/any/a.cs").is_none());
        assert!(classify("contentFiles/csx/any").is_none());
        assert!(classify("contentFiles/csx/any/readme.md").is_none());
    }

    #[test]
    fn test_any_bucket_preferred() {
        let files = paths(&[
            "contentFiles/csx/any/a.csx",
            "contentFiles/csx/netstandard2.0/b.csx",
        ]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles/csx/any/a.csx"]
        );
    }

    #[test]
    fn test_bucket_names_ignore_case() {
        let files = paths(&["contentFiles/csx/Any/a.csx", "contentFiles/csx/ANY/b.csx"]);
        assert_eq!(select_entry_points(&files, "netstandard2.0").len(), 2);
    }

    #[test]
    fn test_supported_framework_bucket() {
        let files = paths(&[
            "contentFiles/csx/net45/old.csx",
            "contentFiles/csx/netstandard2.0/new.csx",
        ]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles/csx/netstandard2.0/new.csx"]
        );
    }

    #[test]
    fn test_unsupported_framework_is_ignored() {
        let files = paths(&["contentFiles/csx/net45/old.csx"]);
        assert!(select_entry_points(&files, "netstandard2.0").is_empty());
    }

    #[test]
    fn test_main_is_entry_point() {
        let files = paths(&[
            "contentFiles/csx/any/other.csx",
            "contentFiles/csx/any/Main.csx",
        ]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles/csx/any/Main.csx"]
        );
    }

    #[test]
    fn test_single_file_is_entry_point() {
        let files = paths(&["contentFiles/csx/any/only.csx"]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles/csx/any/only.csx"]
        );
    }

    #[test]
    fn test_no_main_returns_all() {
        let files = paths(&["contentFiles/csx/any/y.csx", "contentFiles/csx/any/x.csx"]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles/csx/any/x.csx", "contentFiles/csx/any/y.csx"]
        );
    }

    #[test]
    fn test_content_root_is_fallback() {
        let files = paths(&["content/csx/any/legacy.csx"]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["content/csx/any/legacy.csx"]
        );

        let files = paths(&["content/csx/any/legacy.csx", "contentFiles/csx/any/new.csx"]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles/csx/any/new.csx"]
        );
    }

    #[test]
    fn test_windows_separators_select() {
        let files = paths(&["contentFiles\\csx\\any\\main.csx", "contentFiles\\csx\\any\\b.csx"]);
        assert_eq!(
            select_entry_points(&files, "netstandard2.0"),
            vec!["contentFiles\\csx\\any\\main.csx"]
        );
    }

    #[test]
    fn test_resolve_package_directory() {
        let temp = TempDir::new().unwrap();
        let any = temp.path().join("contentFiles/csx/any");
        let tfm = temp.path().join("contentFiles/csx/netstandard2.0");
        fs::create_dir_all(&any).unwrap();
        fs::create_dir_all(&tfm).unwrap();
        fs::write(any.join("main.csx"), "// main").unwrap();
        fs::write(any.join("helper.csx"), "// helper").unwrap();
        fs::write(tfm.join("b.csx"), "// b").unwrap();

        let resolved = BundledScriptResolver::default().resolve(temp.path()).unwrap();
        assert_eq!(resolved, vec![any.join("main.csx")]);
    }

    #[test]
    fn test_resolve_missing_package_is_empty() {
        let temp = TempDir::new().unwrap();
        let resolved = BundledScriptResolver::default()
            .resolve(&temp.path().join("missing"))
            .unwrap();
        assert!(resolved.is_empty());
    }
}
