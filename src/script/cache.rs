/// Execution cache storage and retrieval
///
/// One directory per (script, hash):
///
/// ```text
/// <cache>/execution-cache/<script dir without root>/<script stem>/<hash>/
///     script.dll       compiled artifact
///     script.sha256    the hash, verbatim
///     metadata.json    bookkeeping for `csxdeps cache list`
/// ```
///
/// Concurrent writers of the same hash produce identical bytes, so the last
/// writer wins. Files are written through a temporary name and renamed into
/// place so a reader never observes a half-written record.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::cache_key::HashOutcome;
use crate::storage::path_without_root;

pub const HASH_FILE_NAME: &str = "script.sha256";
pub const ARTIFACT_FILE_NAME: &str = "script.dll";
const METADATA_FILE_NAME: &str = "metadata.json";

/// Cache entry metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub version: u32,
    pub hash: String,
    pub script_path: String,
    pub created_at: DateTime<Utc>,
    pub artifact_size_bytes: u64,
}

/// Cache entry found on disk
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub dir: PathBuf,
    pub metadata: Option<EntryMetadata>,
}

/// Where the artifact used for a run came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Reused from a previous compilation
    Cached(PathBuf),
    /// Compiled now and recorded under its hash
    Compiled(PathBuf),
    /// Compiled now, not cacheable
    Transient(Vec<u8>),
}

/// Execution cache manager
pub struct ExecutionCache {
    root: PathBuf,
}

impl ExecutionCache {
    /// Cache rooted at `<cache_dir>/execution-cache`; nothing is created yet
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            root: cache_dir.join("execution-cache"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entry for `script` under `hash`
    pub fn entry_dir(&self, script: &Path, hash: &str) -> PathBuf {
        let script = script
            .canonicalize()
            .unwrap_or_else(|_| script.to_path_buf());
        let parent = script.parent().unwrap_or_else(|| Path::new(""));
        let stem = script
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "script".to_string());

        self.root
            .join(path_without_root(parent))
            .join(stem)
            .join(hash)
    }

    /// Recorded hash in `dir`, read verbatim
    ///
    /// `Ok(None)` when `dir` is not a directory (missing, or a plain file)
    /// or holds no hash file.
    pub fn try_get_hash(dir: &Path) -> io::Result<Option<String>> {
        if !dir.is_dir() {
            return Ok(None);
        }
        match fs::read_to_string(dir.join(HASH_FILE_NAME)) {
            Ok(hash) => Ok(Some(hash)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Cached artifact for `script` if one was recorded under `hash`
    pub fn lookup(&self, script: &Path, hash: &str) -> Result<Option<PathBuf>> {
        let dir = self.entry_dir(script, hash);
        let recorded = Self::try_get_hash(&dir)
            .with_context(|| format!("Failed to read hash record in {}", dir.display()))?;

        let artifact = dir.join(ARTIFACT_FILE_NAME);
        match recorded {
            Some(recorded) if recorded == hash && artifact.is_file() => {
                tracing::info!(
                    operation = "cache.lookup",
                    status = "hit",
                    hash,
                    script = %script.display(),
                    "execution cache hit"
                );
                Ok(Some(artifact))
            }
            _ => {
                tracing::info!(
                    operation = "cache.lookup",
                    status = "miss",
                    hash,
                    script = %script.display(),
                    "execution cache miss"
                );
                Ok(None)
            }
        }
    }

    /// Store `artifact` for `script` under `hash`
    ///
    /// Entries under other hashes are left alone.
    pub fn record(&self, script: &Path, hash: &str, artifact: &[u8]) -> Result<PathBuf> {
        let dir = self.entry_dir(script, hash);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache entry: {}", dir.display()))?;

        let artifact_path = dir.join(ARTIFACT_FILE_NAME);
        write_atomic(&artifact_path, artifact)?;

        let metadata = EntryMetadata {
            version: 1,
            hash: hash.to_string(),
            script_path: script.display().to_string(),
            created_at: Utc::now(),
            artifact_size_bytes: artifact.len() as u64,
        };
        let metadata_json =
            serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
        write_atomic(&dir.join(METADATA_FILE_NAME), metadata_json.as_bytes())?;

        // Hash record last: its presence marks the entry complete
        write_atomic(&dir.join(HASH_FILE_NAME), hash.as_bytes())?;

        tracing::info!(
            operation = "cache.record",
            status = "success",
            hash,
            size_bytes = artifact.len(),
            script = %script.display(),
            "recorded compiled artifact"
        );
        Ok(artifact_path)
    }

    /// Reuse the artifact recorded for `outcome`, or compile and record one
    ///
    /// `compile` stands in for the compiler collaborator and is only called
    /// on a miss. Without a hash the artifact is compiled and not stored.
    pub fn run_or_compile<F>(&self, script: &Path, outcome: &HashOutcome, compile: F) -> Result<Artifact>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let Some(hash) = outcome.hash() else {
            return Ok(Artifact::Transient(compile()?));
        };

        if let Some(artifact) = self.lookup(script, hash)? {
            return Ok(Artifact::Cached(artifact));
        }

        let bytes = compile()?;
        let path = self.record(script, hash, &bytes)?;
        Ok(Artifact::Compiled(path))
    }

    /// All recorded entries, sorted by path
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        if !self.root.exists() {
            return Ok(entries);
        }

        for entry in walkdir::WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.with_context(|| {
                format!("Failed to read cache directory: {}", self.root.display())
            })?;
            if entry.file_type().is_file() && entry.file_name() == HASH_FILE_NAME {
                let Some(dir) = entry.path().parent() else {
                    continue;
                };
                let metadata = fs::read_to_string(dir.join(METADATA_FILE_NAME))
                    .ok()
                    .and_then(|json| serde_json::from_str(&json).ok());
                entries.push(CacheEntry {
                    dir: dir.to_path_buf(),
                    metadata,
                });
            }
        }

        Ok(entries)
    }

    /// Remove every entry; returns how many were removed
    pub fn clean(&self) -> Result<usize> {
        let count = self.list()?.len();
        if self.root.exists() {
            fs::remove_dir_all(&self.root).with_context(|| {
                format!("Failed to remove cache directory: {}", self.root.display())
            })?;
        }
        Ok(count)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move {} into place", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        cache: ExecutionCache,
        script: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let script = temp.path().join("scripts").join("hello.csx");
            fs::create_dir_all(script.parent().unwrap()).unwrap();
            fs::write(&script, "Console.WriteLine(1);").unwrap();
            let cache = ExecutionCache::new(&temp.path().join("cache"));
            Self {
                temp,
                cache,
                script,
            }
        }
    }

    #[test]
    fn test_try_get_hash_missing_directory() {
        let fx = Fixture::new();
        let result = ExecutionCache::try_get_hash(&fx.temp.path().join("nope")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_try_get_hash_path_is_a_file() {
        let fx = Fixture::new();
        let file = fx.temp.path().join("plain");
        fs::write(&file, "not a directory").unwrap();

        let result = ExecutionCache::try_get_hash(&file).unwrap();
        assert!(result.is_none());
        let result = ExecutionCache::try_get_hash(&file.join("nested")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_try_get_hash_missing_file() {
        let fx = Fixture::new();
        let result = ExecutionCache::try_get_hash(fx.temp.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_try_get_hash_is_verbatim() {
        let fx = Fixture::new();
        fs::write(fx.temp.path().join(HASH_FILE_NAME), "  abc123\n").unwrap();
        let result = ExecutionCache::try_get_hash(fx.temp.path()).unwrap();
        assert_eq!(result.as_deref(), Some("  abc123\n"));
    }

    #[test]
    fn test_record_then_lookup() {
        let fx = Fixture::new();
        assert!(fx.cache.lookup(&fx.script, "aaaa").unwrap().is_none());

        let artifact = fx.cache.record(&fx.script, "aaaa", b"compiled").unwrap();
        assert_eq!(fs::read(&artifact).unwrap(), b"compiled");

        let dir = fx.cache.entry_dir(&fx.script, "aaaa");
        assert_eq!(
            ExecutionCache::try_get_hash(&dir).unwrap().as_deref(),
            Some("aaaa")
        );
        assert_eq!(fx.cache.lookup(&fx.script, "aaaa").unwrap(), Some(artifact));
    }

    #[test]
    fn test_record_is_idempotent() {
        let fx = Fixture::new();
        fx.cache.record(&fx.script, "aaaa", b"compiled").unwrap();
        fx.cache.record(&fx.script, "aaaa", b"compiled").unwrap();
        assert_eq!(fx.cache.list().unwrap().len(), 1);
    }

    #[test]
    fn test_new_hash_keeps_other_entries() {
        let fx = Fixture::new();
        fx.cache.record(&fx.script, "aaaa", b"one").unwrap();
        fx.cache.record(&fx.script, "bbbb", b"two").unwrap();

        assert_ne!(
            fx.cache.entry_dir(&fx.script, "aaaa"),
            fx.cache.entry_dir(&fx.script, "bbbb")
        );
        assert!(fx.cache.lookup(&fx.script, "aaaa").unwrap().is_some());
        assert!(fx.cache.lookup(&fx.script, "bbbb").unwrap().is_some());
        assert_eq!(fx.cache.list().unwrap().len(), 2);
    }

    #[test]
    fn test_run_or_compile_reuses_artifact() {
        let fx = Fixture::new();
        let outcome = HashOutcome::Created("cafe".to_string());
        let calls = Cell::new(0);
        let compile = || {
            calls.set(calls.get() + 1);
            Ok::<_, anyhow::Error>(b"compiled".to_vec())
        };

        let first = fx.cache.run_or_compile(&fx.script, &outcome, compile).unwrap();
        assert!(matches!(first, Artifact::Compiled(_)));

        let second = fx.cache.run_or_compile(&fx.script, &outcome, compile).unwrap();
        assert!(matches!(second, Artifact::Cached(_)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_run_or_compile_without_hash_is_transient() {
        let fx = Fixture::new();
        let artifact = fx
            .cache
            .run_or_compile(&fx.script, &HashOutcome::Disabled, || Ok(b"bits".to_vec()))
            .unwrap();
        assert_eq!(artifact, Artifact::Transient(b"bits".to_vec()));
        assert!(fx.cache.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_reads_metadata_and_clean_removes() {
        let fx = Fixture::new();
        fx.cache.record(&fx.script, "aaaa", b"compiled").unwrap();

        let entries = fx.cache.list().unwrap();
        let metadata = entries[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.hash, "aaaa");
        assert_eq!(metadata.artifact_size_bytes, 8);

        assert_eq!(fx.cache.clean().unwrap(), 1);
        assert!(fx.cache.list().unwrap().is_empty());
    }
}
