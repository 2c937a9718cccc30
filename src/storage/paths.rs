use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Strip the root of `path` so it can be nested under a cache directory
///
/// `/home/me/scripts` becomes `home/me/scripts`. The mapping is injective on
/// component sequences: a leading `_` marks a synthetic component, so a real
/// directory name starting with `_` gets one more `_` in front of it.
/// A Windows prefix such as `C:` becomes `_C`, `..` becomes `_` so nothing
/// escapes the parent, and `.` components are dropped.
pub fn path_without_root(path: &Path) -> PathBuf {
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                let drive: String = prefix
                    .as_os_str()
                    .to_string_lossy()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect();
                relative.push(format!("_{drive}"));
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => relative.push("_"),
            Component::Normal(part) => {
                if part.as_encoded_bytes().first() == Some(&b'_') {
                    let mut escaped = OsString::from("_");
                    escaped.push(part);
                    relative.push(escaped);
                } else {
                    relative.push(part);
                }
            }
        }
    }
    relative
}
