use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading script directives
#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("Package reference '{package}' on line {line} has no version (expected \"nuget: {package}, <version>\")")]
    MissingVersion { package: String, line: usize },

    #[error("Package reference on line {line} has no package id")]
    EmptyPackageId { line: usize },

    #[error("{} loads {}, which does not exist", from.display(), target.display())]
    LoadNotFound { from: PathBuf, target: PathBuf },

    #[error("Failed to read script {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
