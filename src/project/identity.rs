/// Case-insensitive package identity
///
/// NuGet package ids compare ordinally ignoring case, so `Newtonsoft.Json`
/// and `NEWTONSOFT.JSON` name the same package.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Package id; equality, ordering and hashing ignore case
#[derive(Debug, Clone)]
pub struct PackageIdentity(String);

impl PackageIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as originally written
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageIdentity {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        caseless::eq(&self.0, &other.0)
    }
}

impl Eq for PackageIdentity {}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        caseless::hash(&self.0, state);
    }
}

impl PartialOrd for PackageIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        caseless::cmp(&self.0, &other.0)
    }
}

/// Case-folded comparisons shared by the reference value types.
///
/// All three functions fold through `char::to_lowercase` so that
/// `eq`, `cmp` and `hash` stay consistent with each other.
pub(crate) mod caseless {
    use std::cmp::Ordering;
    use std::hash::Hasher;

    fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars().flat_map(char::to_lowercase)
    }

    pub fn eq(a: &str, b: &str) -> bool {
        folded(a).eq(folded(b))
    }

    pub fn cmp(a: &str, b: &str) -> Ordering {
        folded(a).cmp(folded(b))
    }

    pub fn hash<H: Hasher>(s: &str, state: &mut H) {
        for c in folded(s) {
            state.write_u32(c as u32);
        }
        // Terminator keeps ("ab", "c") and ("a", "bc") apart in composite keys
        state.write_u8(0xff);
    }
}
