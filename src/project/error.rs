use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a project descriptor
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("<{element}> element is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Document has no <Project> root element")]
    MissingProjectElement,

    #[error("Invalid project XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while generating a project from scripts
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Directive(#[from] crate::script::DirectiveError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
