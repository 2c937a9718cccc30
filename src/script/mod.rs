//! Script-level concerns: directives, `#load` graphs, bundled package
//! scripts and the execution cache

pub mod bundled;
pub mod cache;
pub mod cache_key;
pub mod directives;
pub mod error;
pub mod loads;

pub use bundled::BundledScriptResolver;
pub use cache::{Artifact, ExecutionCache};
pub use cache_key::{try_create_hash, HashOutcome, HashRequest, OptimizationLevel};
pub use directives::{DirectiveParser, ParseResult, ScriptSourceParser};
pub use error::DirectiveError;
pub use loads::ScriptFilesResolver;
