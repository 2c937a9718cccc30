/// Execution cache key generation
///
/// The key is a SHA256 over everything that determines the compiled
/// artifact:
/// - script sources (entry file plus every `#load`-ed file, in load order,
///   each one a separate field)
/// - optimization level
/// - target framework
/// - script arguments
/// - package sources
///
/// Scripts with floating package versions never get a key: the same source
/// can restore different package bits from one run to the next.
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::directives::ScriptSourceParser;
use super::error::DirectiveError;
use super::loads::ScriptFilesResolver;
use crate::project::{PackageReference, ProjectProvider, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationLevel {
    #[default]
    Debug,
    Release,
}

impl FromStr for OptimizationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(format!(
                "Invalid optimization level: {}. Use: debug, release",
                s
            )),
        }
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => f.write_str("Debug"),
            Self::Release => f.write_str("Release"),
        }
    }
}

/// Everything `try_create_hash` needs to know about one invocation
#[derive(Debug, Clone)]
pub struct HashRequest<'a> {
    pub script: &'a Path,
    pub args: &'a [String],
    pub optimization: OptimizationLevel,
    pub package_sources: &'a [String],
    pub target_framework: &'a str,
    pub no_cache: bool,
}

/// Result of asking for an execution cache key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutcome {
    /// Caching was switched off by the caller
    Disabled,
    /// The script depends on floating package versions
    NotCacheable { floating: Vec<PackageReference> },
    /// Hex encoded SHA256 key
    Created(String),
}

impl HashOutcome {
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Created(hash) => Some(hash),
            _ => None,
        }
    }
}

/// Compute the execution cache key for a script
///
/// `no_cache` is checked before any other work. Otherwise the script's
/// project is generated (which also validates its directives) and
/// cacheability is decided from it.
pub fn try_create_hash<P: ScriptSourceParser>(
    provider: &ProjectProvider<P>,
    request: &HashRequest<'_>,
) -> Result<HashOutcome, ProviderError> {
    if request.no_cache {
        tracing::debug!(
            operation = "cache.hash",
            script = %request.script.display(),
            "caching disabled"
        );
        return Ok(HashOutcome::Disabled);
    }

    let project = provider.build_for_single_file(request.script, request.target_framework)?;
    if !project.descriptor.is_cacheable() {
        let floating: Vec<PackageReference> = project
            .descriptor
            .floating_references()
            .into_iter()
            .cloned()
            .collect();
        for reference in &floating {
            tracing::warn!(
                operation = "cache.hash",
                script = %request.script.display(),
                package = %reference.id,
                version = %reference.version,
                "script is not cacheable: package version is not pinned"
            );
        }
        return Ok(HashOutcome::NotCacheable { floating });
    }

    let files = ScriptFilesResolver::new().resolve(request.script)?;
    let sources = expanded_source(&files)?;
    let hash = compute_hash(
        &sources,
        request.optimization,
        request.target_framework,
        request.args,
        request.package_sources,
    );

    tracing::debug!(
        operation = "cache.hash",
        script = %request.script.display(),
        files = files.len(),
        hash = %hash,
        "computed execution cache key"
    );
    Ok(HashOutcome::Created(hash))
}

/// Bytes of each of `files`, in the given order
pub fn expanded_source(files: &[PathBuf]) -> Result<Vec<Vec<u8>>, DirectiveError> {
    files
        .iter()
        .map(|file| {
            fs::read(file).map_err(|source| DirectiveError::Io {
                path: file.clone(),
                source,
            })
        })
        .collect()
}

/// Hash of the execution inputs
///
/// Every field is length-prefixed so that moving bytes between adjacent
/// fields (`["ab"]` vs `["a", "b"]`) changes the key. Script files count
/// as separate fields too.
pub fn compute_hash(
    sources: &[Vec<u8>],
    optimization: OptimizationLevel,
    target_framework: &str,
    args: &[String],
    package_sources: &[String],
) -> String {
    let mut hasher = Sha256::new();

    hasher.update((sources.len() as u64).to_le_bytes());
    for source in sources {
        update_field(&mut hasher, source);
    }
    update_field(&mut hasher, optimization.to_string().as_bytes());
    update_field(&mut hasher, target_framework.as_bytes());

    hasher.update((args.len() as u64).to_le_bytes());
    for arg in args {
        update_field(&mut hasher, arg.as_bytes());
    }

    hasher.update((package_sources.len() as u64).to_le_bytes());
    for package_source in package_sources {
        update_field(&mut hasher, package_source.as_bytes());
    }

    hex::encode(hasher.finalize())
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
