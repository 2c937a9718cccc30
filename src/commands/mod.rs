pub mod cache;
pub mod config;
pub mod entry_points;
pub mod hash;
pub mod inline;
pub mod project;

use crate::merger::MergedConfig;
use crate::project::{ProjectInfo, ProjectLayout, ProjectProvider};

/// Provider writing descriptors under the configured cache directory
fn provider(config: &MergedConfig) -> ProjectProvider {
    ProjectProvider::new(ProjectLayout::under_cache_dir(&config.cache_dir))
        .with_default_sdk(config.sdk.as_str())
}

/// Print the saved descriptor path (stdout) and a summary (stderr)
fn report_project(info: &ProjectInfo) {
    println!("{}", info.path.display());
    eprintln!(
        "{} {} package reference(s), sdk {}",
        crate::cli_utils::csxdeps_prefix(),
        info.descriptor.package_references().len(),
        info.descriptor.sdk()
    );
}
