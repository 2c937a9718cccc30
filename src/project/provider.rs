/// Project generation from scripts
///
/// Merges the package references found in an entry script (or inline code),
/// every file it transitively `#load`s, and any explicitly listed scripts
/// into one descriptor, then writes it to a deterministic location.
///
/// Merge rules:
/// - references are keyed by `(id, version)` ignoring case; exact duplicates
///   collapse to one entry
/// - the same id at different versions is kept as separate entries and left
///   to the restore step
/// - the first SDK hint wins, with inline code or the entry script ahead of
///   loaded files
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::descriptor::{ProjectDescriptor, DEFAULT_SDK};
use super::error::{ProjectError, ProviderError};
use super::layout::ProjectLayout;
use crate::script::directives::{DirectiveParser, ParseResult, ScriptSourceParser};
use crate::script::loads::ScriptFilesResolver;

const SCRIPT_EXTENSION: &str = "csx";
const NATIVE_PROJECT_EXTENSION: &str = "csproj";

/// Generated descriptor plus the path it was written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub path: PathBuf,
    pub descriptor: ProjectDescriptor,
}

/// Builds and saves project descriptors for scripts
pub struct ProjectProvider<P = DirectiveParser> {
    parser: P,
    layout: ProjectLayout,
    default_sdk: String,
}

impl ProjectProvider<DirectiveParser> {
    pub fn new(layout: ProjectLayout) -> Self {
        Self::with_parser(DirectiveParser, layout)
    }
}

impl<P: ScriptSourceParser> ProjectProvider<P> {
    pub fn with_parser(parser: P, layout: ProjectLayout) -> Self {
        Self {
            parser,
            layout,
            default_sdk: DEFAULT_SDK.to_string(),
        }
    }

    /// SDK for projects whose scripts carry no `#r "sdk: ..."` hint
    pub fn with_default_sdk(mut self, sdk: impl Into<String>) -> Self {
        self.default_sdk = sdk.into();
        self
    }

    /// Project for inline code evaluated in `working_dir`
    pub fn build_for_inline_code(
        &self,
        code: &str,
        working_dir: &Path,
        target_framework: &str,
        name: Option<&str>,
    ) -> Result<ProjectInfo, ProviderError> {
        tracing::debug!(
            operation = "project.inline",
            working_dir = %working_dir.display(),
            target_framework,
            "creating project for inline code"
        );

        let mut result = self.parser.parse_source(code)?;
        let loaded = ScriptFilesResolver::new().resolve_from_source(code, working_dir)?;
        result.absorb(self.parser.parse_files(&loaded)?);

        let working_dir = absolute_dir(working_dir)?;
        let path = self
            .layout
            .descriptor_path(&working_dir, target_framework, name);
        self.save(result, target_framework, path)
    }

    /// Project for the scripts of a directory
    ///
    /// `explicit_files` wins when non-empty; otherwise the directory is
    /// scanned for scripts. Returns `None` only when no scripts were found,
    /// the directory holds no native `.csproj` and
    /// `allow_without_native_project` is not set. Any other case yields a
    /// descriptor, possibly without references.
    pub fn build_for_directory(
        &self,
        dir: &Path,
        explicit_files: Option<&[PathBuf]>,
        target_framework: &str,
        allow_without_native_project: bool,
    ) -> Result<Option<ProjectInfo>, ProviderError> {
        let files = match explicit_files {
            Some(files) if !files.is_empty() => files.to_vec(),
            _ => find_scripts(dir)?,
        };

        if files.is_empty() && !allow_without_native_project && !has_native_project(dir)? {
            tracing::debug!(
                operation = "project.directory",
                dir = %dir.display(),
                "no scripts found and no native project present"
            );
            return Ok(None);
        }

        tracing::debug!(
            operation = "project.directory",
            dir = %dir.display(),
            script_count = files.len(),
            target_framework,
            "creating project for script files"
        );

        let mut resolver = ScriptFilesResolver::new();
        let mut all_files = Vec::new();
        for file in &files {
            all_files.extend(resolver.resolve(file)?);
        }
        let result = self.parser.parse_files(&all_files)?;

        let dir = absolute_dir(dir)?;
        let path = self.layout.descriptor_path(&dir, target_framework, None);
        self.save(result, target_framework, path).map(Some)
    }

    /// Project for one script and everything it loads
    ///
    /// The descriptor is placed under the script's own directory and named
    /// after the script, so scripts in different directories never share a
    /// descriptor.
    pub fn build_for_single_file(
        &self,
        file: &Path,
        target_framework: &str,
    ) -> Result<ProjectInfo, ProviderError> {
        let files = ScriptFilesResolver::new().resolve(file)?;
        let result = self.parser.parse_files(&files)?;

        // resolve() canonicalizes, so the entry is always first and absolute
        let entry = files.first().map(PathBuf::as_path).unwrap_or(file);
        let dir = entry.parent().unwrap_or_else(|| Path::new("."));
        let name = entry.file_stem().and_then(|s| s.to_str());

        let path = self.layout.descriptor_path(dir, target_framework, name);
        self.save(result, target_framework, path)
    }

    fn save(
        &self,
        result: ParseResult,
        target_framework: &str,
        path: PathBuf,
    ) -> Result<ProjectInfo, ProviderError> {
        let descriptor = ProjectDescriptor::new()
            .with_sdk(self.default_sdk.as_str())
            .with_sdk(result.sdk_hint.unwrap_or_default())
            .with_target_framework(target_framework)
            .with_package_references(result.package_references);

        descriptor.save(&path)?;

        tracing::info!(
            operation = "project.save",
            path = %path.display(),
            packages = descriptor.package_references().len(),
            cacheable = descriptor.is_cacheable(),
            "project descriptor ready"
        );

        Ok(ProjectInfo { path, descriptor })
    }
}

/// `dir` as an absolute path, so relative inputs from different working
/// directories never share a descriptor
fn absolute_dir(dir: &Path) -> Result<PathBuf, ProjectError> {
    dir.canonicalize()
        .or_else(|_| std::path::absolute(dir))
        .map_err(|source| ProjectError::Io {
            path: dir.to_path_buf(),
            source,
        })
}

fn has_native_project(dir: &Path) -> Result<bool, ProjectError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(ProjectError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    Ok(entries.filter_map(Result::ok).any(|entry| {
        let path = entry.path();
        path.is_file() && has_extension(&path, NATIVE_PROJECT_EXTENSION)
    }))
}

/// Every `.csx` file below `dir`, sorted for deterministic merging
///
/// A missing directory has no scripts.
fn find_scripts(dir: &Path) -> Result<Vec<PathBuf>, ProviderError> {
    let mut scripts = Vec::new();
    if !dir.is_dir() {
        return Ok(scripts);
    }
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| ProviderError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), SCRIPT_EXTENSION) {
            scripts.push(entry.into_path());
        }
    }
    Ok(scripts)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
