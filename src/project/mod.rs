//! Project model for script dependencies
//!
//! Package identities, version specs, references and the generated
//! project descriptor that the compiler collaborator consumes.

pub mod descriptor;
pub mod error;
pub mod identity;
pub mod layout;
pub mod provider;
pub mod reference;
pub mod version;

pub use descriptor::{ProjectDescriptor, DEFAULT_SDK};
pub use error::{ProjectError, ProviderError};
pub use identity::PackageIdentity;
pub use layout::ProjectLayout;
pub use provider::{ProjectInfo, ProjectProvider};
pub use reference::{AssemblyReference, PackageReference};
pub use version::PackageVersionSpec;
