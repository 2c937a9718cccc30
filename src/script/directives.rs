/// Script directive parser
///
/// Reads the preprocessor-style directives a C# script uses to declare its
/// dependencies:
///
/// ```text
/// #r "nuget: Dapper, 2.1.35"
/// #r "sdk: Microsoft.NET.Sdk.Web"
/// #load "nuget: Helpers.Scripts, 1.0.0"
/// #load "../shared/util.csx"
/// ```
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::error::DirectiveError;
use crate::project::PackageReference;

/// Package references and SDK hint read from one or more scripts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub package_references: Vec<PackageReference>,
    pub sdk_hint: Option<String>,
}

impl ParseResult {
    /// Fold `other` into `self`; an SDK hint already present is kept
    pub fn absorb(&mut self, other: ParseResult) {
        self.package_references.extend(other.package_references);
        if self.sdk_hint.is_none() {
            self.sdk_hint = other.sdk_hint;
        }
    }
}

/// Source of package references for the dependency merger
pub trait ScriptSourceParser {
    fn parse_source(&self, source: &str) -> Result<ParseResult, DirectiveError>;

    /// Parse each file in order and aggregate the results
    fn parse_files(&self, files: &[PathBuf]) -> Result<ParseResult, DirectiveError> {
        let mut result = ParseResult::default();
        for file in files {
            let source = read_script(file)?;
            result.absorb(self.parse_source(&source)?);
        }
        Ok(result)
    }
}

/// Regex-based parser for `#r` and `#load` directives
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveParser;

impl ScriptSourceParser for DirectiveParser {
    fn parse_source(&self, source: &str) -> Result<ParseResult, DirectiveError> {
        let mut result = ParseResult::default();

        for caps in package_regex().captures_iter(source) {
            let line = line_of(source, &caps);
            let id = caps.get(1).map_or("", |m| m.as_str().trim());
            if id.is_empty() {
                return Err(DirectiveError::EmptyPackageId { line });
            }
            let version = caps.get(2).map_or("", |m| m.as_str().trim());
            if version.is_empty() {
                return Err(DirectiveError::MissingVersion {
                    package: id.to_string(),
                    line,
                });
            }
            result
                .package_references
                .push(PackageReference::new(id, version));
        }

        result.sdk_hint = sdk_regex()
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|sdk| !sdk.is_empty())
            .map(str::to_string);

        Ok(result)
    }
}

/// File paths named by `#load` directives, in source order
///
/// `#load "nuget: ..."` names a package, not a file, and is skipped.
pub fn load_targets(source: &str) -> Vec<String> {
    load_regex()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|target| !target.is_empty() && !is_package_target(target))
        .collect()
}

pub(crate) fn read_script(path: &Path) -> Result<String, DirectiveError> {
    fs::read_to_string(path).map_err(|source| DirectiveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_package_target(target: &str) -> bool {
    target
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("nuget:"))
}

fn line_of(source: &str, caps: &Captures<'_>) -> usize {
    let offset = caps.get(0).map_or(0, |m| m.start());
    source[..offset].matches('\n').count() + 1
}

fn package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#(?:r|load)[ \t]+"[ \t]*(?i:nuget):[ \t]*([^",]*)(?:,([^"]*))?""#)
            .expect("package directive regex")
    })
}

fn sdk_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#r[ \t]+"[ \t]*(?i:sdk):([^"]*)""#).expect("sdk directive regex")
    })
}

fn load_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#load[ \t]+"([^"]*)""#).expect("load directive regex")
    })
}
