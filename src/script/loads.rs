/// `#load` graph walking
///
/// Collects every script file reachable from an entry script through `#load`
/// directives. Order is depth-first pre-order (a file, then the files it
/// loads, in directive order) and each file appears once, so the expanded
/// source is stable across runs. `#load` cycles terminate at the first
/// revisit.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::directives::{load_targets, read_script};
use super::error::DirectiveError;

/// Resolves the transitive `#load` closure of a script
#[derive(Debug, Default)]
pub struct ScriptFilesResolver {
    visited: HashSet<PathBuf>,
}

impl ScriptFilesResolver {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
        }
    }

    /// Entry script followed by every transitively loaded file
    pub fn resolve(&mut self, entry: &Path) -> Result<Vec<PathBuf>, DirectiveError> {
        let entry = canonical(entry, None)?;
        let mut files = Vec::new();
        self.visit(entry, &mut files)?;
        Ok(files)
    }

    /// Files loaded (transitively) by inline code, relative to `working_dir`
    ///
    /// The inline code itself is not a file and is not part of the result.
    pub fn resolve_from_source(
        &mut self,
        code: &str,
        working_dir: &Path,
    ) -> Result<Vec<PathBuf>, DirectiveError> {
        let mut files = Vec::new();
        for target in load_targets(code) {
            let path = canonical(&working_dir.join(&target), Some(working_dir))?;
            self.visit(path, &mut files)?;
        }
        Ok(files)
    }

    fn visit(&mut self, path: PathBuf, files: &mut Vec<PathBuf>) -> Result<(), DirectiveError> {
        if !self.visited.insert(path.clone()) {
            return Ok(());
        }

        let source = read_script(&path)?;
        files.push(path.clone());

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        for target in load_targets(&source) {
            let target_path = canonical(&base_dir.join(&target), Some(&path))?;
            self.visit(target_path, files)?;
        }

        Ok(())
    }
}

fn canonical(path: &Path, from: Option<&Path>) -> Result<PathBuf, DirectiveError> {
    path.canonicalize().map_err(|source| match from {
        Some(from) if source.kind() == std::io::ErrorKind::NotFound => {
            DirectiveError::LoadNotFound {
                from: from.to_path_buf(),
                target: path.to_path_buf(),
            }
        }
        _ => DirectiveError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}
