/// Package version specs and pin classification
///
/// A version is pinned when it names exactly one release. Only pinned
/// versions make a script eligible for the execution cache, because a
/// floating version (`1.0.*`, `[1.0,2.0)`) may resolve to different bits
/// between runs.
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use super::identity::caseless;

/// 2 to 4 numeric components, optional prerelease and build metadata
const PINNED_PATTERN: &str = r"^\d+(\.\d+){1,3}(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$";

fn pinned_regex() -> &'static Regex {
    static PINNED: OnceLock<Regex> = OnceLock::new();
    PINNED.get_or_init(|| Regex::new(PINNED_PATTERN).expect("pinned version regex"))
}

/// Returns true when `value` names an exact version
///
/// Surrounding brackets (`[1.2.3]`) are stripped only when both are present;
/// an unbalanced bracket fails the match. Leading zeros in numeric components
/// are accepted.
pub fn is_pinned(value: &str) -> bool {
    let core = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(value);
    pinned_regex().is_match(core)
}

/// Version string attached to a package reference
///
/// `None` models an absent version. Equality and hashing ignore case;
/// two absent versions are equal, an absent version never equals a present one.
#[derive(Debug, Clone, Default)]
pub struct PackageVersionSpec(Option<String>);

impl PackageVersionSpec {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_pinned(&self) -> bool {
        self.0.as_deref().is_some_and(is_pinned)
    }
}

impl fmt::Display for PackageVersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or(""))
    }
}

impl From<&str> for PackageVersionSpec {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq for PackageVersionSpec {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => caseless::eq(a, b),
            _ => false,
        }
    }
}

impl Eq for PackageVersionSpec {}

impl Hash for PackageVersionSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            None => state.write_u8(0),
            Some(value) => {
                state.write_u8(1);
                caseless::hash(value, state);
            }
        }
    }
}

impl PartialOrd for PackageVersionSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersionSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => caseless::cmp(a, b),
        }
    }
}
