use std::fmt;

use super::identity::PackageIdentity;
use super::version::PackageVersionSpec;

/// Package id plus requested version
///
/// Two references are the same set element only when both id and version
/// match (ignoring case). The same id at two versions stays two elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageReference {
    pub id: PackageIdentity,
    pub version: PackageVersionSpec,
}

impl PackageReference {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: PackageIdentity::new(id),
            version: PackageVersionSpec::new(version),
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.version.is_pinned()
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.id, self.version)
    }
}

/// Framework assembly or assembly path referenced directly (`System.Xml`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssemblyReference(String);

impl AssemblyReference {
    pub fn new(assembly: impl Into<String>) -> Self {
        Self(assembly.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssemblyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
