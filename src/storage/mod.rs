//! On-disk locations for generated projects and the execution cache

pub mod cache_dir;
pub mod paths;

pub use cache_dir::default_cache_dir;
pub use paths::path_without_root;
